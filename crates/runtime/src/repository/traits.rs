//! Repository contract for durable respawn records.

use world_core::{RespawnRecord, SpawnId};

use super::Result;

/// Durable storage of respawn records, keyed by spawn id.
///
/// Only the persistence worker writes here; the map reads and writes the
/// [`crate::RespawnStore`] cache in front of it.
pub trait SpawnRepository: Send + Sync {
    /// Inserts or replaces the record of `record.spawn_id`.
    fn save(&self, record: &RespawnRecord) -> Result<()>;

    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>>;

    /// Removes a record. Missing records are not an error.
    fn delete(&self, spawn_id: SpawnId) -> Result<()>;

    fn exists(&self, spawn_id: SpawnId) -> bool;

    /// Every stored record, ordered by spawn id.
    fn load_all(&self) -> Result<Vec<RespawnRecord>>;

    /// Reads a record that must exist.
    fn require(&self, spawn_id: SpawnId) -> Result<RespawnRecord> {
        self.load(spawn_id)?
            .ok_or(super::RepositoryError::NotFound(spawn_id))
    }
}
