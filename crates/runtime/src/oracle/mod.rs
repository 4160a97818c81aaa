//! Runtime wrappers around static world content.
//!
//! These implementations expose `world-core` oracle traits and bundle them
//! into an [`OracleManager`] so the map can build [`WorldEnv`] snapshots on
//! demand. The data is immutable once the runtime is built; dynamic state
//! lives in the map and the respawn store.
mod spells;
mod templates;

use std::sync::Arc;

use world_content::WorldContent;
use world_core::{GameClock, PcgRng, SpawnStore, WorldConfig, WorldEnv, WorldOracle};

pub use spells::SpellRegistry;
pub use templates::TemplateRegistry;

/// Owns the static registries for the lifetime of a runtime.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) templates: Arc<TemplateRegistry>,
    pub(crate) spells: Arc<SpellRegistry>,
    pub(crate) config: Arc<WorldConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(templates: TemplateRegistry, spells: SpellRegistry, config: WorldConfig) -> Self {
        Self {
            templates: Arc::new(templates),
            spells: Arc::new(spells),
            config: Arc::new(config),
            rng: PcgRng,
        }
    }

    /// Builds the registries from loaded content.
    pub fn from_content(content: &WorldContent) -> Self {
        Self::new(
            TemplateRegistry::new(content.templates.iter().cloned()),
            SpellRegistry::new(content.spells.iter().cloned()),
            content.config.clone(),
        )
    }

    /// Environment for one tick: static registries plus the map-owned
    /// collaborators.
    pub fn env<'a>(
        &'a self,
        clock: &'a dyn GameClock,
        world: &'a dyn WorldOracle,
        spawns: &'a dyn SpawnStore,
    ) -> WorldEnv<'a> {
        WorldEnv::with_all(
            self.templates.as_ref(),
            self.spells.as_ref(),
            clock,
            &self.rng,
            world,
            spawns,
            self.config.as_ref(),
        )
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn spells(&self) -> &SpellRegistry {
        &self.spells
    }

    pub fn rng(&self) -> &PcgRng {
        &self.rng
    }
}
