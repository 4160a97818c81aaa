use crate::env::{OracleError, WorldEnv};
use crate::state::{ObjectGuid, PoolId, Timestamp};

use super::state::DestructibleState;

/// Side effect requested by an instance for its owning map to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectEvent {
    CollisionChanged { enabled: bool },
    /// Visual despawn notification to nearby clients.
    DespawnAnimation,
    /// Hide the instance from nearby players; it stays resident.
    DestroyForNearbyPlayers,
    VisibilityUpdate,
    /// A compatibility-mode instance came back and re-enters the world.
    AddedToMap,
    PoolUpdate { pool: PoolId },
    /// Drop the instance from the map.
    RemoveFromWorld,
    DespawnLinkedTrap { trap: ObjectGuid },
    TriggerLinkedTrap { trap: ObjectGuid, user: ObjectGuid },
    CastSpell {
        spell: u32,
        caster: ObjectGuid,
        target: Option<ObjectGuid>,
    },
    LootRollEnded { group: u64 },
    FishEscaped { owner: ObjectGuid },
    OwnerReleased { owner: ObjectGuid },
    CustomAnimation { anim: u32 },
    TransportFrameRefresh,
    DestructibleStateChanged { state: DestructibleState },
}

/// Per-call context: collaborators plus the event outbox.
pub struct ObjectContext<'a> {
    env: WorldEnv<'a>,
    events: Vec<ObjectEvent>,
}

impl<'a> ObjectContext<'a> {
    pub fn new(env: WorldEnv<'a>) -> Self {
        Self {
            env,
            events: Vec::new(),
        }
    }

    pub fn env(&self) -> &WorldEnv<'a> {
        &self.env
    }

    pub fn now(&self) -> Result<Timestamp, OracleError> {
        Ok(self.env.clock()?.now())
    }

    pub fn now_ms(&self) -> Result<u64, OracleError> {
        Ok(self.env.clock()?.now_ms())
    }

    pub fn emit(&mut self, event: ObjectEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ObjectEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ObjectEvent> {
        std::mem::take(&mut self.events)
    }
}
