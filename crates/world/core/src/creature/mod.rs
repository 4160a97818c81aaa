//! Creature engagement and evade controllers.
//!
//! [`CreatureAi`] holds the per-actor behavior state (boundary handle,
//! perception guard, script). Operations take the [`Creature`] they drive
//! plus a [`CombatContext`] carrying the threat collaborator and the event
//! outbox, mirroring how object lifecycles use `ObjectContext`.
mod engagement;
mod evade;
mod guard;
mod script;
mod threat;
mod unit;

pub use engagement::ZoneCombatant;
pub use guard::ReentrancyGuard;
pub use script::{CreatureScript, NullCreatureScript};
pub use threat::{CombatContext, ThreatService};
pub use unit::{Creature, MotionCommand, ReactState, UnitKind, UnitState, UnitView};

use crate::boundary::BoundaryHandle;
use crate::config::WorldConfig;
use crate::state::ObjectGuid;

/// Why a creature leaves combat. Selected by the AI, carried unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum EvadeReason {
    NoHostiles,
    Boundary,
    Other,
}

/// Client-visible reaction emote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiReaction {
    Alert,
}

/// Side effect requested by a creature controller.
#[derive(Clone, Debug, PartialEq)]
pub enum CreatureEvent {
    MotionChanged(MotionCommand),
    AttackStarted { target: ObjectGuid },
    AttackStopped,
    AiReaction(AiReaction),
    EvadeEntered(EvadeReason),
    /// The map should test the creature against its boundary right away.
    BoundaryCheckRequested,
}

/// Behavioral state attached to one creature.
pub struct CreatureAi {
    boundary: Option<BoundaryHandle>,
    perception: ReentrancyGuard,
    script: Box<dyn CreatureScript>,
    follow_distance: f32,
}

impl CreatureAi {
    pub fn new(script: Box<dyn CreatureScript>) -> Self {
        Self {
            boundary: None,
            perception: ReentrancyGuard::new(),
            script,
            follow_distance: WorldConfig::DEFAULT_FOLLOW_DISTANCE,
        }
    }

    pub fn with_follow_distance(mut self, distance: f32) -> Self {
        self.follow_distance = distance;
        self
    }

    pub fn boundary(&self) -> Option<&BoundaryHandle> {
        self.boundary.as_ref()
    }

    pub fn perception_guard(&self) -> &ReentrancyGuard {
        &self.perception
    }

    /// Marks the start of a perception dispatch for this creature.
    ///
    /// Returns false when one is already running; the caller must then drop
    /// the nested dispatch.
    pub fn enter_perception(&mut self) -> bool {
        self.perception.try_enter()
    }

    pub fn exit_perception(&mut self) {
        self.perception.exit();
    }
}

impl Default for CreatureAi {
    fn default() -> Self {
        Self::new(Box::new(NullCreatureScript))
    }
}

impl std::fmt::Debug for CreatureAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatureAi")
            .field("boundary", &self.boundary)
            .field("perception", &self.perception)
            .field("follow_distance", &self.follow_distance)
            .finish_non_exhaustive()
    }
}
