use crate::object::context::ObjectContext;
use crate::object::error::LifecycleError;
use crate::object::state::{GoFlags, GoState, LootState};
use crate::object::template::GooberData;
use crate::object::GameObjectInstance;

use super::{Disposal, KindHooks};

impl KindHooks for GooberData {
    fn activated(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if cx.now_ms()? >= obj.cooldown_ms {
            obj.flags.remove(GoFlags::IN_USE);
            obj.set_loot_state(LootState::JustDeactivated, None, cx);
            obj.cooldown_ms = 0;
        }
        Ok(())
    }

    /// Rewards every unique user once, then closes again.
    fn deactivated(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<Disposal, LifecycleError> {
        let users = std::mem::take(&mut obj.unique_users);
        if let Some(spell) = self.spell {
            for user in users {
                obj.cast_spell(spell, user, Some(user), cx)?;
            }
        }
        obj.use_count = 0;
        obj.set_go_state(GoState::Ready, cx);

        if obj.flags.contains(GoFlags::NODESPAWN) {
            return Ok(Disposal::Keep);
        }
        Ok(Disposal::Dispose)
    }
}
