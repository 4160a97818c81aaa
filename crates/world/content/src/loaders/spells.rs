//! Spell record loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::SpellInfo;

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpellCatalog {
    spells: Vec<SpellInfo>,
}

pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellInfo>> {
        let catalog: SpellCatalog = parse_ron(path, "spell catalog")?;
        Ok(catalog.spells)
    }
}
