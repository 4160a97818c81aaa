use crate::config::WorldConfig;
use crate::env::compute_seed;
use crate::object::context::{ObjectContext, ObjectEvent};
use crate::object::error::LifecycleError;
use crate::object::state::{GoFlags, GoState, LootState};
use crate::object::template::FishingHoleData;
use crate::object::GameObjectInstance;

use super::{Arming, KindHooks, ObjectKind, RespawnReset};

/// Fishing bobbers: ready shortly before their timer ends, escape after it.
pub(crate) struct FishingNodeHooks;

impl KindHooks for FishingNodeHooks {
    fn arm(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<Arming, LifecycleError> {
        let now = cx.now()?;
        if now > obj.respawn_time - WorldConfig::FISHING_BOBBER_READY_SECS {
            if let Some(owner) = obj.owner
                && cx.env().world()?.is_player(owner)
            {
                obj.set_go_state(GoState::Active, cx);
                obj.flags = GoFlags::NODESPAWN;
                cx.emit(ObjectEvent::CustomAnimation { anim: 0 });
            }
            obj.set_loot_state(LootState::Ready, None, cx);
        }
        Ok(Arming::Hold)
    }

    fn on_respawn(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<RespawnReset, LifecycleError> {
        if let Some(owner) = obj.owner
            && cx.env().world()?.is_player(owner)
        {
            cx.emit(ObjectEvent::FishEscaped { owner });
            cx.emit(ObjectEvent::OwnerReleased { owner });
        }
        obj.set_loot_state(LootState::JustDeactivated, None, cx);
        Ok(RespawnReset::Deactivated)
    }
}

impl KindHooks for FishingHoleData {
    fn on_respawn(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<RespawnReset, LifecycleError> {
        let seed = compute_seed(
            cx.env().config()?.map_seed,
            cx.now()?.as_secs(),
            obj.guid.0,
            0,
        );
        let opens = cx
            .env()
            .rng()?
            .range(seed, self.min_restock, self.max_restock);
        if let ObjectKind::FishingHole { remaining_opens } = &mut obj.kind {
            *remaining_opens = opens;
        }
        Ok(RespawnReset::Continue)
    }
}
