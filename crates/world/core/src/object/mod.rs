//! Game-object instances and their lifecycle state machine.
//!
//! An instance moves through `NotReady → Ready → Activated → JustDeactivated`
//! and then either back to `NotReady`/`Ready` or out of the world. Type
//! specific rules (traps, doors, goobers, transports, fishing, chests) are
//! implemented per template variant in [`kinds`]; this module owns the
//! shared bookkeeping.
//!
//! Instances never touch the map directly. Every operation takes an
//! [`ObjectContext`] and pushes [`ObjectEvent`]s that the owning map applies
//! after the call returns.
mod ai;
mod context;
mod despawn;
mod destructible;
mod error;
mod interact;
pub mod kinds;
mod lifecycle;
mod state;
mod template;
mod transitions;

pub use ai::{NullObjectAi, ObjectAi};
pub use context::{ObjectContext, ObjectEvent};
pub use error::{CreateError, LifecycleError};
pub use interact::{Interactor, UseOutcome};
pub use kinds::ObjectKind;
pub use state::{DestructibleState, GoFlags, GoState, LootState};
pub use template::{
    BuildingData, ChestData, DoorData, FishingHoleData, GameObjectTemplate, GooberData,
    SpellCasterData, TemplateKind, TransportData, TrapData,
};

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::env::WorldEnv;
use crate::state::{ObjectGuid, PoolId, Position, SpawnId, Timestamp};

/// Respawn persistence strategy, fixed for an instance's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum RespawnMode {
    /// The despawned instance stays resident and re-adds itself.
    Compatibility,
    /// The instance leaves the map; the respawn sweep recreates it.
    Modern,
}

/// Persisted placement data of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnInfo {
    pub spawn_id: SpawnId,
    /// Spawn whose death gates this one's respawn.
    pub master: Option<SpawnId>,
    pub pool: Option<PoolId>,
    /// Spawn-group flag selecting [`RespawnMode::Compatibility`].
    pub compatibility_mode: bool,
}

impl SpawnInfo {
    /// Placement of an object that is not database-backed.
    pub const fn transient() -> Self {
        Self {
            spawn_id: SpawnId::NONE,
            master: None,
            pool: None,
            compatibility_mode: true,
        }
    }

    pub const fn persisted(spawn_id: SpawnId) -> Self {
        Self {
            spawn_id,
            master: None,
            pool: None,
            compatibility_mode: false,
        }
    }

    pub const fn with_master(mut self, master: SpawnId) -> Self {
        self.master = Some(master);
        self
    }

    pub const fn with_pool(mut self, pool: PoolId) -> Self {
        self.pool = Some(pool);
        self
    }

    pub const fn with_compatibility_mode(mut self, enabled: bool) -> Self {
        self.compatibility_mode = enabled;
        self
    }
}

/// Inputs of [`GameObjectInstance::create`].
#[derive(Clone, Debug)]
pub struct CreateParams {
    pub guid: ObjectGuid,
    pub entry: u32,
    pub position: Position,
    pub spawn: SpawnInfo,
    pub spawned_by_default: bool,
    pub respawn_delay_secs: u32,
    pub owner: Option<ObjectGuid>,
    pub spell_id: Option<u32>,
    pub go_state: Option<GoState>,
}

impl CreateParams {
    pub fn new(guid: ObjectGuid, entry: u32, position: Position) -> Self {
        Self {
            guid,
            entry,
            position,
            spawn: SpawnInfo::transient(),
            spawned_by_default: true,
            respawn_delay_secs: 0,
            owner: None,
            spell_id: None,
            go_state: None,
        }
    }

    pub fn with_spawn(mut self, spawn: SpawnInfo) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_respawn_delay(mut self, secs: u32) -> Self {
        self.respawn_delay_secs = secs;
        self
    }

    pub fn spawned_by_default(mut self, enabled: bool) -> Self {
        self.spawned_by_default = enabled;
        self
    }

    /// Marks the instance as summoned by `owner`, optionally through a spell.
    pub fn summoned_by(mut self, owner: ObjectGuid, spell_id: Option<u32>) -> Self {
        self.owner = Some(owner);
        self.spell_id = spell_id;
        self
    }

    pub fn with_go_state(mut self, state: GoState) -> Self {
        self.go_state = Some(state);
        self
    }
}

/// A placed interactive prop.
pub struct GameObjectInstance {
    guid: ObjectGuid,
    spawn: SpawnInfo,
    template: Arc<GameObjectTemplate>,
    position: Position,
    loot_state: LootState,
    loot_state_unit: Option<ObjectGuid>,
    go_state: GoState,
    prev_go_state: GoState,
    flags: GoFlags,
    respawn_mode: RespawnMode,
    respawn_delay_secs: u32,
    respawn_time: Timestamp,
    spawned_by_default: bool,
    kind: ObjectKind,
    use_count: u32,
    unique_users: BTreeSet<ObjectGuid>,
    owner: Option<ObjectGuid>,
    spell_id: Option<u32>,
    /// Game time (ms) the current activation or re-arm ends.
    cooldown_ms: u64,
    /// Game time (ms) the template use cooldown ends.
    use_cooldown_ms: u64,
    anim_progress: u8,
    linked_trap: Option<ObjectGuid>,
    despawn_delay_ms: u32,
    despawn_respawn_secs: u32,
    collision: bool,
    in_world: bool,
    removed: bool,
    ai: Box<dyn ObjectAi>,
}

impl GameObjectInstance {
    /// Builds an instance from its template.
    ///
    /// Fails for invalid positions, unknown templates and types that are
    /// never created by hand. Modern respawn needs a default-spawned,
    /// persisted placement; anything else is switched to compatibility mode
    /// with a warning.
    pub fn create(
        params: CreateParams,
        env: &WorldEnv<'_>,
        ai: Box<dyn ObjectAi>,
    ) -> Result<Self, CreateError> {
        if !params.position.is_valid() {
            return Err(CreateError::InvalidPosition {
                entry: params.entry,
                position: params.position,
            });
        }
        let template = env
            .templates()?
            .template(params.entry)
            .ok_or(CreateError::UnknownTemplate(params.entry))?;
        if matches!(template.kind, TemplateKind::MapObjTransport) {
            return Err(CreateError::ManualCreationDisallowed(params.entry));
        }

        let mut respawn_mode = if params.spawn.compatibility_mode {
            RespawnMode::Compatibility
        } else {
            RespawnMode::Modern
        };
        if respawn_mode == RespawnMode::Modern
            && (params.spawn.spawn_id.is_none() || !params.spawned_by_default)
        {
            tracing::warn!(
                entry = params.entry,
                spawn = %params.spawn.spawn_id,
                spawned_by_default = params.spawned_by_default,
                "modern respawn requires a default-spawned persisted placement; using compatibility mode"
            );
            respawn_mode = RespawnMode::Compatibility;
        }

        let kind = ObjectKind::for_template(&template, params.guid, env)?;
        let go_state = params.go_state.unwrap_or_else(|| template.initial_go_state());

        tracing::trace!(guid = %params.guid, entry = params.entry, kind = template.kind.as_ref(), "game object created");

        Ok(Self {
            guid: params.guid,
            spawn: params.spawn,
            position: params.position,
            loot_state: LootState::NotReady,
            loot_state_unit: None,
            go_state,
            prev_go_state: go_state,
            flags: template.flags,
            respawn_mode,
            respawn_delay_secs: params.respawn_delay_secs,
            respawn_time: Timestamp::ZERO,
            spawned_by_default: params.spawned_by_default,
            kind,
            use_count: 0,
            unique_users: BTreeSet::new(),
            owner: params.owner,
            spell_id: params.spell_id,
            cooldown_ms: 0,
            use_cooldown_ms: 0,
            anim_progress: 0,
            linked_trap: None,
            despawn_delay_ms: 0,
            despawn_respawn_secs: 0,
            collision: false,
            in_world: false,
            removed: false,
            template,
            ai,
        })
    }

    pub fn guid(&self) -> ObjectGuid {
        self.guid
    }

    pub fn entry(&self) -> u32 {
        self.template.entry
    }

    pub fn template(&self) -> &Arc<GameObjectTemplate> {
        &self.template
    }

    pub fn spawn(&self) -> &SpawnInfo {
        &self.spawn
    }

    pub fn spawn_id(&self) -> SpawnId {
        self.spawn.spawn_id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn loot_state(&self) -> LootState {
        self.loot_state
    }

    /// Unit that caused the latest loot-state change.
    pub fn loot_state_unit(&self) -> Option<ObjectGuid> {
        self.loot_state_unit
    }

    pub fn go_state(&self) -> GoState {
        self.go_state
    }

    pub fn flags(&self) -> GoFlags {
        self.flags
    }

    pub fn respawn_mode(&self) -> RespawnMode {
        self.respawn_mode
    }

    pub fn respawn_time(&self) -> Timestamp {
        self.respawn_time
    }

    pub fn respawn_delay_secs(&self) -> u32 {
        self.respawn_delay_secs
    }

    pub fn is_spawned_by_default(&self) -> bool {
        self.spawned_by_default
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    pub fn unique_users(&self) -> impl Iterator<Item = ObjectGuid> + '_ {
        self.unique_users.iter().copied()
    }

    pub fn owner(&self) -> Option<ObjectGuid> {
        self.owner
    }

    pub fn spell_id(&self) -> Option<u32> {
        self.spell_id
    }

    pub fn anim_progress(&self) -> u8 {
        self.anim_progress
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn linked_trap(&self) -> Option<ObjectGuid> {
        self.linked_trap
    }

    /// Links the trap the map spawned for this object's template.
    pub fn set_linked_trap(&mut self, trap: ObjectGuid) {
        self.linked_trap = Some(trap);
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision
    }

    pub fn is_in_world(&self) -> bool {
        self.in_world
    }

    /// Set once the instance asked its map to drop it.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Whether the instance is currently present for players.
    pub fn is_spawned(&self) -> bool {
        self.respawn_delay_secs == 0
            || (self.respawn_time.is_set() && !self.spawned_by_default)
            || (!self.respawn_time.is_set() && self.spawned_by_default)
    }

    pub fn add_use(&mut self) {
        self.use_count += 1;
    }

    /// Counts a use and remembers the user for one-shot rewards.
    pub fn add_unique_use(&mut self, user: ObjectGuid) {
        self.add_use();
        self.unique_users.insert(user);
    }

    /// Enters the world and syncs collision with the current posture.
    pub fn add_to_world(&mut self, cx: &mut ObjectContext<'_>) {
        if self.in_world {
            return;
        }
        self.in_world = true;
        let toggled = match self.template.kind {
            TemplateKind::Chest(_) => self.loot_state == LootState::Ready,
            _ => self.go_state == GoState::Ready || self.template.is_transport(),
        };
        self.enable_collision(toggled, cx);
    }

    pub fn remove_from_world(&mut self) {
        self.in_world = false;
    }
}

impl fmt::Debug for GameObjectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObjectInstance")
            .field("guid", &self.guid)
            .field("entry", &self.template.entry)
            .field("spawn", &self.spawn.spawn_id)
            .field("loot_state", &self.loot_state)
            .field("go_state", &self.go_state)
            .field("respawn_mode", &self.respawn_mode)
            .field("respawn_time", &self.respawn_time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing;
