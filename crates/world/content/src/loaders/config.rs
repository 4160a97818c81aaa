//! World configuration loader.

use std::path::Path;

use anyhow::Context;
use world_core::WorldConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for world configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a [`WorldConfig`]; missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<WorldConfig> {
        let content = read_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config TOML {}", path.display()))
    }
}
