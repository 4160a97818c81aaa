//! Traits describing the collaborators this core consumes.
//!
//! Oracles expose object templates, spell records, game time, randomness,
//! map-level unit queries and respawn storage. The [`WorldEnv`] aggregate
//! bundles them so the lifecycle and respawn code can reach everything it
//! needs without hard coupling to concrete implementations.
mod clock;
mod error;
mod rng;
mod spells;
mod store;
mod templates;
mod world;

pub use clock::GameClock;
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use spells::{Difficulty, SpellInfo, SpellOracle};
pub use store::{SpawnStore, StoreError};
pub use templates::TemplateOracle;
pub use world::WorldOracle;

use crate::config::WorldConfig;

/// Aggregates the collaborators required by a lifecycle tick.
///
/// Every slot is optional so tests can provide only what an operation
/// touches; accessors report the missing collaborator as an [`OracleError`].
#[derive(Clone, Copy)]
pub struct WorldEnv<'a> {
    templates: Option<&'a dyn TemplateOracle>,
    spells: Option<&'a dyn SpellOracle>,
    clock: Option<&'a dyn GameClock>,
    rng: Option<&'a dyn RngOracle>,
    world: Option<&'a dyn WorldOracle>,
    spawns: Option<&'a dyn SpawnStore>,
    config: Option<&'a WorldConfig>,
}

impl<'a> WorldEnv<'a> {
    pub fn with_all(
        templates: &'a dyn TemplateOracle,
        spells: &'a dyn SpellOracle,
        clock: &'a dyn GameClock,
        rng: &'a dyn RngOracle,
        world: &'a dyn WorldOracle,
        spawns: &'a dyn SpawnStore,
        config: &'a WorldConfig,
    ) -> Self {
        Self {
            templates: Some(templates),
            spells: Some(spells),
            clock: Some(clock),
            rng: Some(rng),
            world: Some(world),
            spawns: Some(spawns),
            config: Some(config),
        }
    }

    pub fn empty() -> Self {
        Self {
            templates: None,
            spells: None,
            clock: None,
            rng: None,
            world: None,
            spawns: None,
            config: None,
        }
    }

    pub fn with_templates(mut self, templates: &'a dyn TemplateOracle) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_spells(mut self, spells: &'a dyn SpellOracle) -> Self {
        self.spells = Some(spells);
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn GameClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_world(mut self, world: &'a dyn WorldOracle) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_spawns(mut self, spawns: &'a dyn SpawnStore) -> Self {
        self.spawns = Some(spawns);
        self
    }

    pub fn with_config(mut self, config: &'a WorldConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Returns the TemplateOracle, or an error if not available.
    pub fn templates(&self) -> Result<&'a dyn TemplateOracle, OracleError> {
        self.templates.ok_or(OracleError::TemplatesNotAvailable)
    }

    /// Returns the SpellOracle, or an error if not available.
    pub fn spells(&self) -> Result<&'a dyn SpellOracle, OracleError> {
        self.spells.ok_or(OracleError::SpellsNotAvailable)
    }

    /// Returns the GameClock, or an error if not available.
    pub fn clock(&self) -> Result<&'a dyn GameClock, OracleError> {
        self.clock.ok_or(OracleError::ClockNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Returns the WorldOracle, or an error if not available.
    pub fn world(&self) -> Result<&'a dyn WorldOracle, OracleError> {
        self.world.ok_or(OracleError::WorldNotAvailable)
    }

    /// Returns the SpawnStore, or an error if not available.
    pub fn spawns(&self) -> Result<&'a dyn SpawnStore, OracleError> {
        self.spawns.ok_or(OracleError::SpawnsNotAvailable)
    }

    /// Returns the WorldConfig, or an error if not available.
    pub fn config(&self) -> Result<&'a WorldConfig, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }
}
