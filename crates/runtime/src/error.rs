//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from content loading, repositories, lifecycle calls and
//! worker coordination so the binary can bubble them up with context.
use thiserror::Error;

use world_core::{
    CreateError, ErrorSeverity, GameError, LifecycleError, ObjectGuid, OracleError, StoreError,
};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to load world content")]
    Content(#[source] anyhow::Error),

    #[error("persistence worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("persistence queue closed")]
    PersistenceClosed,

    #[error("unknown game object {0}")]
    UnknownObject(ObjectGuid),

    #[error("unknown creature {0}")]
    UnknownCreature(ObjectGuid),

    #[error("unknown player {0}")]
    UnknownPlayer(ObjectGuid),

    #[error("unknown unit {0}")]
    UnknownUnit(ObjectGuid),

    #[error("runtime requires world content before building")]
    MissingContent,
}

impl RuntimeError {
    /// Severity of the wrapped core error, when there is one.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Lifecycle(err) => err.severity(),
            RuntimeError::Oracle(err) => err.severity(),
            RuntimeError::Create(err) => err.severity(),
            RuntimeError::Store(err) => err.severity(),
            RuntimeError::UnknownObject(_)
            | RuntimeError::UnknownCreature(_)
            | RuntimeError::UnknownPlayer(_)
            | RuntimeError::UnknownUnit(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Internal,
        }
    }
}
