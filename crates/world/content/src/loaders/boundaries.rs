//! Boundary definition loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::{Boundary, BoundaryId, BoundaryRegistry};

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryDefinition {
    pub id: BoundaryId,
    pub boundary: Boundary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoundaryFile {
    boundaries: Vec<BoundaryDefinition>,
}

pub struct BoundaryLoader;

impl BoundaryLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<BoundaryDefinition>> {
        let file: BoundaryFile = parse_ron(path, "boundary")?;
        Ok(file.boundaries)
    }

    /// Loads the definitions straight into a registry.
    pub fn load_registry(path: &Path) -> LoadResult<BoundaryRegistry> {
        let mut registry = BoundaryRegistry::new();
        for definition in Self::load(path)? {
            if registry.insert(definition.id, definition.boundary).is_some() {
                anyhow::bail!("duplicate boundary {:?} in {}", definition.id, path.display());
            }
        }
        Ok(registry)
    }
}
