//! Runtime hosting for `world-core` maps.
//!
//! This crate supplies the collaborators the deterministic core only sees
//! through traits (clock, templates, spells, threat, respawn storage) and
//! drives a [`WorldMap`] tick by tick.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`map`] owns instances and creatures and applies their side effects
//! - [`store`] and [`repository`] keep the respawn schedule, in memory and on disk
//! - [`oracle`] serves static content to the core
//! - [`threat`] implements threat lists and faction hostility
//! - [`logging`] and [`config`] set up the process
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod map;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod store;
pub mod threat;

mod workers;

pub use clock::MapClock;
pub use config::{LoggingConfig, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use logging::init_logging;
pub use map::{
    CreatureSlot, MapServices, MarkerBoard, ObjectNotice, PlacedMarker, PlayerState,
    PopulateReport, TickReport, UnitIndex, WorldMap,
};
pub use oracle::{OracleManager, SpellRegistry, TemplateRegistry};
pub use repository::{FileSpawnRepo, InMemorySpawnRepo, RepositoryError, SpawnRepository};
pub use runtime::{RunSummary, Runtime, RuntimeBuilder};
pub use store::RespawnStore;
pub use threat::{FactionId, ThreatManager};
pub use workers::{PersistCommand, PersistStats};
