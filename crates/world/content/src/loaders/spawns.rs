//! Spawn table loader.

use std::collections::HashSet;
use std::path::Path;

use crate::loaders::{LoadResult, parse_ron};
use crate::spawns::SpawnTable;

pub struct SpawnLoader;

impl SpawnLoader {
    /// Loads placements. Persisted object spawn ids must be unique.
    pub fn load(path: &Path) -> LoadResult<SpawnTable> {
        let table: SpawnTable = parse_ron(path, "spawn table")?;
        let mut seen = HashSet::new();
        for spawn in &table.objects {
            let id = spawn.spawn.spawn_id;
            anyhow::ensure!(
                id.is_none() || seen.insert(id),
                "duplicate object spawn {id} in {}",
                path.display()
            );
        }
        Ok(table)
    }
}
