use crate::object::context::ObjectContext;
use crate::object::error::LifecycleError;
use crate::object::template::DoorData;
use crate::object::GameObjectInstance;

use super::{KindHooks, RespawnReset};

impl KindHooks for DoorData {
    fn on_respawn(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<RespawnReset, LifecycleError> {
        if obj.go_state != obj.prev_go_state {
            obj.set_go_state(obj.prev_go_state, cx);
        }
        Ok(RespawnReset::Continue)
    }

    fn activated(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if obj.cooldown_ms != 0 && cx.now_ms()? >= obj.cooldown_ms {
            obj.reset_door_or_button(cx);
        }
        Ok(())
    }
}
