//! Content loaders reading world data from files.

pub mod boundaries;
pub mod config;
pub mod factory;
pub mod spawns;
pub mod spells;
pub mod templates;

pub use boundaries::BoundaryLoader;
pub use config::ConfigLoader;
pub use factory::{ContentFactory, WorldContent};
pub use spawns::SpawnLoader;
pub use spells::SpellLoader;
pub use templates::TemplateLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content).with_context(|| format!("failed to parse {what} RON {}", path.display()))
}
