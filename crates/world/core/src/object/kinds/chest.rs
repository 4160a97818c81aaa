use crate::object::context::{ObjectContext, ObjectEvent};
use crate::object::error::LifecycleError;
use crate::object::template::ChestData;
use crate::object::GameObjectInstance;

use super::{KindHooks, ObjectKind};

/// Pending group loot roll on an opened chest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LootRoll {
    pub group: u64,
    pub remaining_ms: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChestState {
    pub loot_roll: Option<LootRoll>,
}

impl KindHooks for ChestData {
    fn activated(
        &self,
        obj: &mut GameObjectInstance,
        diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        let ObjectKind::Chest(state) = &mut obj.kind else {
            return Ok(());
        };
        if let Some(roll) = &mut state.loot_roll {
            if roll.remaining_ms <= diff {
                let group = roll.group;
                state.loot_roll = None;
                cx.emit(ObjectEvent::LootRollEnded { group });
            } else {
                roll.remaining_ms -= diff;
            }
        }
        Ok(())
    }
}
