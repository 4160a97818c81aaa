//! High-level runtime orchestrator.
//!
//! The runtime owns the map, its clock and respawn store, and the
//! persistence worker. Ticks run synchronously on the caller; only durable
//! writes happen on a background task.
use std::sync::Arc;

use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::info;
use world_content::WorldContent;

use crate::clock::MapClock;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::map::{MapServices, TickReport, WorldMap};
use crate::oracle::{OracleManager, SpellRegistry, TemplateRegistry};
use crate::repository::{FileSpawnRepo, InMemorySpawnRepo, SpawnRepository};
use crate::store::RespawnStore;
use crate::workers::{PersistStats, PersistenceHandle, PersistenceWorker};

/// Totals of a [`Runtime::run_for`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub respawned: usize,
    pub object_errors: usize,
    pub notices: usize,
}

/// Drives one map.
pub struct Runtime {
    config: RuntimeConfig,
    oracles: OracleManager,
    clock: MapClock,
    store: RespawnStore,
    map: WorldMap,
    persistence: PersistenceHandle,
    ticks: u64,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn clock(&self) -> &MapClock {
        &self.clock
    }

    pub fn store(&self) -> &RespawnStore {
        &self.store
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    /// Direct access for calls that need no collaborators (players,
    /// boundaries, creature orders).
    pub fn map_mut(&mut self) -> &mut WorldMap {
        &mut self.map
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs `f` against the map with the runtime's collaborators.
    pub fn with_map<R>(&mut self, f: impl FnOnce(&mut WorldMap, &MapServices<'_>) -> R) -> R {
        let services = MapServices {
            oracles: &self.oracles,
            clock: &self.clock,
            store: &self.store,
        };
        f(&mut self.map, &services)
    }

    /// Advances by one configured tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.advance(self.config.tick_ms)
    }

    /// Advances game time by `diff_ms` and ticks the map once.
    ///
    /// Deferred respawn records are flushed every
    /// `flush_interval_ticks` ticks.
    pub fn advance(&mut self, diff_ms: u32) -> Result<TickReport> {
        self.clock.advance(diff_ms);
        let report = self.with_map(|map, services| map.tick(diff_ms, services));
        self.ticks += 1;
        if self.ticks % u64::from(self.config.flush_interval_ticks.max(1)) == 0 {
            self.store.flush()?;
        }
        Ok(report)
    }

    /// Ticks `ticks` times, paced by the configured tick length.
    pub async fn run_for(&mut self, ticks: u64) -> Result<RunSummary> {
        let mut pacer = interval(Duration::from_millis(u64::from(self.config.tick_ms)));
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            pacer.tick().await;
            let report = self.tick()?;
            summary.ticks += 1;
            summary.respawned += report.respawned;
            summary.object_errors += report.object_errors;
            summary.notices += report.notices.len();
        }
        Ok(summary)
    }

    /// Sends every deferred record and waits until the worker applied it.
    pub async fn flush(&self) -> Result<usize> {
        let sent = self.store.flush()?;
        self.persistence.sync().await?;
        Ok(sent)
    }

    /// Flushes pending records and stops the persistence worker.
    pub async fn shutdown(self) -> Result<PersistStats> {
        self.flush().await?;
        let stats = self.persistence.shutdown().await?;
        info!(ticks = self.ticks, saved = stats.saved, failed = stats.failed, "runtime stopped");
        Ok(stats)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<WorldContent>,
    repository: Option<Arc<dyn SpawnRepository>>,
    start_ms: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            repository: None,
            start_ms: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide loaded world content (required).
    pub fn content(mut self, content: WorldContent) -> Self {
        self.content = Some(content);
        self
    }

    /// Durable store of respawn records.
    ///
    /// Defaults to a [`FileSpawnRepo`] under `data_dir` when configured,
    /// otherwise to memory.
    pub fn repository(mut self, repository: Arc<dyn SpawnRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Game time of the first tick; defaults to the wall clock.
    pub fn start_time_ms(mut self, start_ms: u64) -> Self {
        self.start_ms = Some(start_ms);
        self
    }

    /// Loads persisted respawn records, starts the persistence worker and
    /// populates the map. Must run inside a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let config = self.config;

        let mut world_config = content.config.clone();
        if world_config.map_seed == 0 {
            world_config.map_seed = rand::random();
            info!(seed = world_config.map_seed, "no map seed configured; rolled one");
        }
        let follow_distance = world_config.follow_distance;
        let oracles = OracleManager::new(
            TemplateRegistry::new(content.templates.iter().cloned()),
            SpellRegistry::new(content.spells.iter().cloned()),
            world_config,
        );

        let repository: Arc<dyn SpawnRepository> = match (self.repository, &config.data_dir) {
            (Some(repository), _) => repository,
            (None, Some(dir)) => Arc::new(FileSpawnRepo::new(dir)?),
            (None, None) => Arc::new(InMemorySpawnRepo::new()),
        };
        let records = repository.load_all()?;

        let persistence = PersistenceWorker::spawn(Arc::clone(&repository), config.persist_retries);
        let links: Vec<_> = content
            .spawns
            .objects_on(config.map)
            .filter_map(|spawn| spawn.spawn.master.map(|master| (spawn.spawn.spawn_id, master)))
            .collect();
        let store = RespawnStore::new(persistence.sender()).with_links(links);
        let preloaded = store.preload(records)?;

        let clock = match self.start_ms {
            Some(start_ms) => MapClock::new(start_ms),
            None => MapClock::from_wall_clock(),
        };
        let map = WorldMap::new(config.map, &content.spawns, content.boundaries)
            .with_follow_distance(follow_distance);

        let mut runtime = Runtime {
            config,
            oracles,
            clock,
            store,
            map,
            persistence,
            ticks: 0,
        };
        let populated = runtime.with_map(|map, services| map.populate(services));
        info!(
            map = runtime.config.map.0,
            respawn_records = preloaded,
            objects = populated.objects,
            creatures = populated.creatures,
            "runtime ready"
        );
        Ok(runtime)
    }
}
