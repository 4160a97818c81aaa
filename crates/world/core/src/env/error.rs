//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when a collaborator is missing from the environment.
///
/// A map that cannot reach its templates, clock or storage cannot advance
/// any instance, so these are classified as fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("TemplateOracle not available")]
    TemplatesNotAvailable,

    #[error("SpellOracle not available")]
    SpellsNotAvailable,

    #[error("GameClock not available")]
    ClockNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("WorldOracle not available")]
    WorldNotAvailable,

    #[error("SpawnStore not available")]
    SpawnsNotAvailable,

    #[error("WorldConfig not available")]
    ConfigNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            TemplatesNotAvailable => "ORACLE_TEMPLATES_NOT_AVAILABLE",
            SpellsNotAvailable => "ORACLE_SPELLS_NOT_AVAILABLE",
            ClockNotAvailable => "ORACLE_CLOCK_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            WorldNotAvailable => "ORACLE_WORLD_NOT_AVAILABLE",
            SpawnsNotAvailable => "ORACLE_SPAWNS_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
        }
    }
}
