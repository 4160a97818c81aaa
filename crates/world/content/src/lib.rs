//! Data-driven world content and its loaders.
//!
//! Content lives in a data directory of RON/TOML files:
//! - Game object templates (RON)
//! - Object and creature spawn placements (RON)
//! - Boundary definitions (RON)
//! - Spell records (RON)
//! - World configuration (TOML)
//!
//! Content is consumed by runtime oracles; world-core never reads files.

pub mod spawns;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use spawns::{CreatureSpawn, ObjectSpawn, SpawnTable};

#[cfg(feature = "loaders")]
pub use loaders::{
    BoundaryLoader, ConfigLoader, ContentFactory, LoadResult, SpawnLoader, SpellLoader,
    TemplateLoader, WorldContent,
};
