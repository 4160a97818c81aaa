use crate::env::{OracleError, StoreError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

/// Why the factory refused to build an instance.
///
/// Callers log these and carry on; a bad placement never stops a map.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CreateError {
    #[error("unknown game object template {0}")]
    UnknownTemplate(u32),

    #[error("template {entry} placed at invalid position {position:?}")]
    InvalidPosition { entry: u32, position: Position },

    #[error("template {0} cannot be created manually")]
    ManualCreationDisallowed(u32),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CreateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CreateError::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CreateError::UnknownTemplate(_) => "CREATE_UNKNOWN_TEMPLATE",
            CreateError::InvalidPosition { .. } => "CREATE_INVALID_POSITION",
            CreateError::ManualCreationDisallowed(_) => "CREATE_MANUAL_CREATION_DISALLOWED",
            CreateError::Oracle(err) => err.error_code(),
        }
    }
}

/// Failure surfaced by a lifecycle call; the map logs it and moves on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LifecycleError::Oracle(err) => err.severity(),
            LifecycleError::Store(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::Oracle(err) => err.error_code(),
            LifecycleError::Store(err) => err.error_code(),
        }
    }
}
