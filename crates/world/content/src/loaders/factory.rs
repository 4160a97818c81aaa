//! Content factory loading a whole data directory.

use std::path::{Path, PathBuf};

use world_core::{BoundaryRegistry, GameObjectTemplate, SpellInfo, WorldConfig};

use crate::loaders::{
    BoundaryLoader, ConfigLoader, LoadResult, SpawnLoader, SpellLoader, TemplateLoader,
};
use crate::spawns::SpawnTable;

/// Everything a runtime needs from a data directory.
#[derive(Debug)]
pub struct WorldContent {
    pub config: WorldConfig,
    pub templates: Vec<GameObjectTemplate>,
    pub spells: Vec<SpellInfo>,
    pub spawns: SpawnTable,
    pub boundaries: BoundaryRegistry,
}

/// Loads world content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── templates.ron
/// ├── spawns.ron
/// ├── boundaries.ron
/// └── spells.ron
/// ```
///
/// `config.toml` and `boundaries.ron` are optional.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load_config(&self) -> LoadResult<WorldConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(WorldConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_templates(&self) -> LoadResult<Vec<GameObjectTemplate>> {
        TemplateLoader::load(&self.data_dir.join("templates.ron"))
    }

    pub fn load_spawns(&self) -> LoadResult<SpawnTable> {
        SpawnLoader::load(&self.data_dir.join("spawns.ron"))
    }

    pub fn load_spells(&self) -> LoadResult<Vec<SpellInfo>> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    pub fn load_boundaries(&self) -> LoadResult<BoundaryRegistry> {
        let path = self.data_dir.join("boundaries.ron");
        if !path.exists() {
            return Ok(BoundaryRegistry::new());
        }
        BoundaryLoader::load_registry(&path)
    }

    /// Loads every file and checks spawns reference known templates.
    pub fn load_all(&self) -> LoadResult<WorldContent> {
        let content = WorldContent {
            config: self.load_config()?,
            templates: self.load_templates()?,
            spells: self.load_spells()?,
            spawns: self.load_spawns()?,
            boundaries: self.load_boundaries()?,
        };
        for spawn in &content.spawns.objects {
            anyhow::ensure!(
                content.templates.iter().any(|t| t.entry == spawn.entry),
                "spawn {} references unknown template {}",
                spawn.spawn.spawn_id,
                spawn.entry
            );
        }
        tracing::info!(
            templates = content.templates.len(),
            spawns = content.spawns.objects.len(),
            creatures = content.spawns.creatures.len(),
            boundaries = content.boundaries.len(),
            "world content loaded"
        );
        Ok(content)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
