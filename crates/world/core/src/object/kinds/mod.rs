//! Per-type behavior of game objects.
//!
//! Each template variant implements [`KindHooks`], a small set of
//! state-entry/state-tick callbacks the lifecycle invokes. Variants without
//! special rules fall back to the default hooks. Mutable per-instance data
//! lives in [`ObjectKind`].
mod chest;
mod door;
mod fishing;
mod goober;
mod transport;
mod trap;

pub use chest::{ChestState, LootRoll};
pub use transport::{MAX_STOP_FRAMES, TransportState};

use arrayvec::ArrayVec;

use crate::env::{WorldEnv, compute_seed};
use crate::state::ObjectGuid;

use super::context::{ObjectContext, ObjectEvent};
use super::error::{CreateError, LifecycleError};
use super::state::{DestructibleState, LootState};
use super::template::{GameObjectTemplate, TemplateKind};
use super::GameObjectInstance;

/// Mutable per-type payload of an instance.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Plain,
    Chest(ChestState),
    Transport(TransportState),
    FishingHole { remaining_opens: u32 },
    Building(BuildingState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingState {
    pub health: u32,
    pub max_health: u32,
    pub state: DestructibleState,
}

impl ObjectKind {
    pub(crate) fn for_template(
        template: &GameObjectTemplate,
        guid: ObjectGuid,
        env: &WorldEnv<'_>,
    ) -> Result<Self, CreateError> {
        Ok(match &template.kind {
            TemplateKind::Chest(_) => ObjectKind::Chest(ChestState::default()),
            TemplateKind::Transport(data) => {
                let mut stop_frames = ArrayVec::new();
                for frame in data.stop_frames.iter().copied() {
                    if stop_frames.try_push(frame).is_err() {
                        tracing::warn!(entry = template.entry, "transport defines more than {MAX_STOP_FRAMES} stop frames");
                        break;
                    }
                }
                ObjectKind::Transport(TransportState {
                    path_progress_ms: 0,
                    state_update_timer_ms: 0,
                    stop_frames,
                })
            }
            TemplateKind::FishingHole(data) => {
                let seed = compute_seed(env.config()?.map_seed, 0, guid.0, 0);
                ObjectKind::FishingHole {
                    remaining_opens: env.rng()?.range(seed, data.min_restock, data.max_restock),
                }
            }
            TemplateKind::DestructibleBuilding(data) => ObjectKind::Building(BuildingState {
                health: data.max_health,
                max_health: data.max_health,
                state: DestructibleState::Intact,
            }),
            _ => ObjectKind::Plain,
        })
    }
}

/// Outcome of the `NotReady` arming tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Arming {
    /// Armed; the `Ready` rules run in the same tick.
    Armed,
    /// Still waiting; the tick ends here.
    Hold,
}

/// Outcome of the type-specific reset when a compatibility timer expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RespawnReset {
    Continue,
    /// The hook already deactivated the instance.
    Deactivated,
}

/// Whether `JustDeactivated` proceeds to the despawn decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Disposal {
    Dispose,
    /// The instance stays as it is.
    Keep,
}

pub(crate) trait KindHooks: Sync {
    fn arm(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<Arming, LifecycleError> {
        obj.set_loot_state(LootState::Ready, None, cx);
        Ok(Arming::Armed)
    }

    fn on_respawn(
        &self,
        _obj: &mut GameObjectInstance,
        _cx: &mut ObjectContext<'_>,
    ) -> Result<RespawnReset, LifecycleError> {
        Ok(RespawnReset::Continue)
    }

    /// Activation check while spawned and ready. Defaults to charge
    /// exhaustion.
    fn ready(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        let max_charges = obj.template.charges();
        if max_charges > 0 && obj.use_count >= max_charges {
            obj.use_count = 0;
            obj.set_loot_state(LootState::JustDeactivated, None, cx);
        }
        Ok(())
    }

    fn activated(
        &self,
        _obj: &mut GameObjectInstance,
        _diff: u32,
        _cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn deactivated(
        &self,
        _obj: &mut GameObjectInstance,
        _cx: &mut ObjectContext<'_>,
    ) -> Result<Disposal, LifecycleError> {
        Ok(Disposal::Dispose)
    }
}

/// Types whose lifecycle follows the shared rules only.
struct DefaultHooks;

impl KindHooks for DefaultHooks {}

static DEFAULT_HOOKS: DefaultHooks = DefaultHooks;
static FISHING_NODE_HOOKS: fishing::FishingNodeHooks = fishing::FishingNodeHooks;

impl TemplateKind {
    pub(crate) fn hooks(&self) -> &dyn KindHooks {
        match self {
            TemplateKind::Door(data) | TemplateKind::Button(data) => data,
            TemplateKind::Chest(data) => data,
            TemplateKind::Trap(data) => data,
            TemplateKind::Goober(data) => data,
            TemplateKind::Transport(data) => data,
            TemplateKind::FishingNode => &FISHING_NODE_HOOKS,
            TemplateKind::FishingHole(data) => data,
            TemplateKind::SpellCaster(_)
            | TemplateKind::DestructibleBuilding(_)
            | TemplateKind::MapObjTransport
            | TemplateKind::Generic => &DEFAULT_HOOKS,
        }
    }
}

impl GameObjectInstance {
    /// Requests a cast after checking the spell exists for the map difficulty.
    pub(crate) fn cast_spell(
        &self,
        spell: u32,
        caster: ObjectGuid,
        target: Option<ObjectGuid>,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        let difficulty = cx.env().config()?.difficulty;
        if cx.env().spells()?.spell(spell, difficulty).is_none() {
            tracing::warn!(guid = %self.guid, spell, %difficulty, "unknown spell; cast skipped");
            return Ok(());
        }
        cx.emit(ObjectEvent::CastSpell {
            spell,
            caster,
            target,
        });
        Ok(())
    }
}
