//! In-memory SpawnRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use world_core::{RespawnRecord, SpawnId};

use super::{RepositoryError, Result, SpawnRepository};

/// Respawn records held in process memory.
pub struct InMemorySpawnRepo {
    records: RwLock<BTreeMap<SpawnId, RespawnRecord>>,
}

impl InMemorySpawnRepo {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create pre-filled with `records`.
    pub fn with_records(records: impl IntoIterator<Item = RespawnRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.spawn_id, record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for InMemorySpawnRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnRepository for InMemorySpawnRepo {
    fn save(&self, record: &RespawnRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.spawn_id, record.clone());
        Ok(())
    }

    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&spawn_id).cloned())
    }

    fn delete(&self, spawn_id: SpawnId) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.remove(&spawn_id);
        Ok(())
    }

    fn exists(&self, spawn_id: SpawnId) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(&spawn_id))
            .unwrap_or(false)
    }

    fn load_all(&self) -> Result<Vec<RespawnRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.values().cloned().collect())
    }
}
