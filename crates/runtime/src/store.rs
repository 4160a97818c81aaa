//! Map-memory respawn schedule in front of the persistence worker.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, RwLock};

use tokio::sync::mpsc;
use world_core::{RespawnRecord, SpawnId, SpawnStore, StoreError, Timestamp};

use crate::workers::PersistCommand;

/// Respawn records of one map.
///
/// The cache answers every read made during a tick. Immediate saves and
/// deletes are forwarded to the persistence worker right away; deferred
/// saves only mark the record dirty until the next [`Self::flush`].
pub struct RespawnStore {
    cache: RwLock<BTreeMap<SpawnId, RespawnRecord>>,
    dirty: Mutex<BTreeSet<SpawnId>>,
    /// Static master links from the spawn table.
    links: HashMap<SpawnId, SpawnId>,
    queue: mpsc::UnboundedSender<PersistCommand>,
}

impl RespawnStore {
    pub fn new(queue: mpsc::UnboundedSender<PersistCommand>) -> Self {
        Self {
            cache: RwLock::new(BTreeMap::new()),
            dirty: Mutex::new(BTreeSet::new()),
            links: HashMap::new(),
            queue,
        }
    }

    /// Installs the static `dependant → master` link table.
    pub fn with_links(mut self, links: impl IntoIterator<Item = (SpawnId, SpawnId)>) -> Self {
        self.links = links.into_iter().collect();
        self
    }

    /// Seeds the cache with records read back from durable storage.
    pub fn preload(&self, records: impl IntoIterator<Item = RespawnRecord>) -> Result<usize, StoreError> {
        let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
        let before = cache.len();
        for record in records {
            cache.insert(record.spawn_id, record);
        }
        Ok(cache.len() - before)
    }

    /// Enqueues every dirty record. Returns how many were sent.
    pub fn flush(&self) -> Result<usize, StoreError> {
        let pending: Vec<SpawnId> = {
            let mut dirty = self.dirty.lock().map_err(|_| StoreError::LockPoisoned)?;
            std::mem::take(&mut *dirty).into_iter().collect()
        };
        if pending.is_empty() {
            return Ok(0);
        }
        let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut sent = 0;
        for spawn_id in pending {
            // Deleted since it was marked; the delete is already queued.
            let Some(record) = cache.get(&spawn_id) else {
                continue;
            };
            self.enqueue(PersistCommand::Save(record.clone()))?;
            sent += 1;
        }
        tracing::debug!(records = sent, "respawn records flushed");
        Ok(sent)
    }

    /// Records saved deferred and not yet flushed.
    pub fn dirty_count(&self) -> Result<usize, StoreError> {
        let dirty = self.dirty.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(dirty.len())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(cache.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn enqueue(&self, command: PersistCommand) -> Result<(), StoreError> {
        self.queue.send(command).map_err(|_| StoreError::QueueClosed)
    }
}

impl SpawnStore for RespawnStore {
    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>, StoreError> {
        let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(cache.get(&spawn_id).cloned())
    }

    fn save(&self, record: &RespawnRecord, immediate: bool) -> Result<(), StoreError> {
        {
            let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
            cache.insert(record.spawn_id, record.clone());
        }
        let mut dirty = self.dirty.lock().map_err(|_| StoreError::LockPoisoned)?;
        if immediate {
            dirty.remove(&record.spawn_id);
            drop(dirty);
            self.enqueue(PersistCommand::Save(record.clone()))
        } else {
            dirty.insert(record.spawn_id);
            Ok(())
        }
    }

    fn delete(&self, spawn_id: SpawnId) -> Result<(), StoreError> {
        let removed = {
            let mut cache = self.cache.write().map_err(|_| StoreError::LockPoisoned)?;
            cache.remove(&spawn_id).is_some()
        };
        self.dirty
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(&spawn_id);
        if removed {
            self.enqueue(PersistCommand::Delete(spawn_id))?;
        }
        Ok(())
    }

    fn master_of(&self, spawn_id: SpawnId) -> Result<Option<SpawnId>, StoreError> {
        if let Some(master) = self.links.get(&spawn_id) {
            return Ok(Some(*master));
        }
        Ok(self.load(spawn_id)?.and_then(|record| record.master))
    }

    fn due(&self, now: Timestamp) -> Result<Vec<RespawnRecord>, StoreError> {
        let cache = self.cache.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut due: Vec<RespawnRecord> = cache
            .values()
            .filter(|record| record.respawn_time.is_set() && record.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|record| (record.respawn_time, record.spawn_id));
        Ok(due)
    }
}
