//! Deterministic behavior rules for interactive world objects and creatures.
//!
//! `world-core` defines the lifecycle state machine of placed game objects,
//! the respawn scheduler, the creature engagement/evade controllers and the
//! boundary containment service. Everything here is I/O-free: collaborators
//! (storage, threat, clocks, templates) are reached through the traits in
//! [`env`] and the owning map applies the side effects each call emits.
pub mod boundary;
pub mod config;
pub mod creature;
pub mod env;
pub mod error;
pub mod object;
pub mod respawn;
pub mod state;

pub use boundary::{
    AreaBoundary, Boundary, BoundaryHandle, BoundaryId, BoundaryRegistry, Marker, MarkerSink,
    Shape, VisualizeReport, VisualizeStatus,
};
pub use config::{RespawnScalingMode, WorldConfig};
pub use creature::{
    AiReaction, CombatContext, Creature, CreatureAi, CreatureEvent, CreatureScript, EvadeReason,
    MotionCommand, NullCreatureScript, ReactState, ReentrancyGuard, ThreatService, UnitKind,
    UnitState, UnitView, ZoneCombatant,
};
pub use env::{
    Difficulty, GameClock, OracleError, PcgRng, RngOracle, SpawnStore, SpellInfo, SpellOracle,
    StoreError, TemplateOracle, WorldEnv, WorldOracle, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use object::{
    CreateError, CreateParams, DestructibleState, GameObjectInstance, GameObjectTemplate, GoFlags,
    GoState, Interactor, LifecycleError, LootState, NullObjectAi, ObjectAi, ObjectContext,
    ObjectEvent, ObjectKind, RespawnMode, SpawnInfo, TemplateKind, UseOutcome,
};
pub use respawn::{LinkedRespawn, RespawnRecord, RespawnScheduler, ScalingPolicy};
pub use state::{MapId, ObjectGuid, PoolId, Position, SpawnId, Timestamp};
