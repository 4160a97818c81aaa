use crate::error::{ErrorSeverity, GameError};
use crate::respawn::RespawnRecord;
use crate::state::{SpawnId, Timestamp};

/// Errors reported by a storage collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("respawn storage unavailable: {0}")]
    Unavailable(String),

    #[error("persistence queue closed")]
    QueueClosed,

    #[error("respawn storage lock poisoned")]
    LockPoisoned,
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::Unavailable(_) | StoreError::QueueClosed => ErrorSeverity::Recoverable,
            StoreError::LockPoisoned => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::QueueClosed => "STORE_QUEUE_CLOSED",
            StoreError::LockPoisoned => "STORE_LOCK_POISONED",
        }
    }
}

/// Storage collaborator for respawn records.
///
/// Implementations keep a map-memory view that is always current and push
/// records to durable storage asynchronously:
/// - `save(record, true)` asks for the durable write to be enqueued now
/// - `save(record, false)` updates map memory only; a later batch flush
///   persists it
/// - Neither call blocks on I/O
pub trait SpawnStore: Send + Sync {
    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>, StoreError>;

    fn save(&self, record: &RespawnRecord, immediate: bool) -> Result<(), StoreError>;

    fn delete(&self, spawn_id: SpawnId) -> Result<(), StoreError>;

    /// Spawn whose death gates `spawn_id`'s respawn, from the static link
    /// table or, failing that, the persisted record.
    fn master_of(&self, spawn_id: SpawnId) -> Result<Option<SpawnId>, StoreError> {
        Ok(self.load(spawn_id)?.and_then(|record| record.master))
    }

    /// Records whose respawn time is at or before `now`, ordered by time.
    fn due(&self, now: Timestamp) -> Result<Vec<RespawnRecord>, StoreError>;
}
