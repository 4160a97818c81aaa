//! Error types raised by repository implementations.

use thiserror::Error;
use world_core::SpawnId;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("spawn repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("no respawn record for {0}")]
    NotFound(SpawnId),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
