use crate::config::WorldConfig;
use crate::object::context::ObjectContext;
use crate::object::error::LifecycleError;
use crate::object::state::LootState;
use crate::object::template::TrapData;
use crate::object::GameObjectInstance;

use super::{Arming, KindHooks};

/// Proximity radius used by battleground traps that define no radius.
const FALLBACK_RADIUS: f32 = 3.0;
const FALLBACK_RADIUS_COOLDOWN_SECS: u32 = 3;

impl TrapData {
    fn trigger_radius(&self) -> Option<f32> {
        if self.radius == 0 {
            (self.cooldown_secs == FALLBACK_RADIUS_COOLDOWN_SECS).then_some(FALLBACK_RADIUS)
        } else {
            Some(self.radius as f32 / 2.0)
        }
    }

    fn recast_cooldown_ms(&self) -> u64 {
        let secs = if self.cooldown_secs > 0 {
            self.cooldown_secs
        } else {
            WorldConfig::DEFAULT_TRAP_COOLDOWN_SECS
        };
        u64::from(secs) * 1000
    }
}

impl KindHooks for TrapData {
    /// Bombs always wait; other traps wait only while their owner fights.
    fn arm(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<Arming, LifecycleError> {
        let now_ms = cx.now_ms()?;
        if self.is_bomb() {
            obj.cooldown_ms = now_ms + WorldConfig::BOMB_ARM_DELAY_MS;
        } else if let Some(owner) = obj.owner
            && cx.env().world()?.is_in_combat(owner)
        {
            obj.cooldown_ms = now_ms + u64::from(self.start_delay_secs) * 1000;
        }
        obj.set_loot_state(LootState::Ready, None, cx);
        Ok(Arming::Armed)
    }

    fn ready(
        &self,
        obj: &mut GameObjectInstance,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if cx.now_ms()? < obj.cooldown_ms {
            return Ok(());
        }
        if self.is_bomb() {
            obj.set_loot_state(LootState::Activated, None, cx);
            return Ok(());
        }
        let Some(radius) = self.trigger_radius() else {
            return Ok(());
        };
        let target = cx
            .env()
            .world()?
            .find_trap_target(&obj.position, radius, obj.owner);
        if let Some(target) = target {
            obj.set_loot_state(LootState::Activated, Some(target), cx);
        }
        Ok(())
    }

    fn activated(
        &self,
        obj: &mut GameObjectInstance,
        _diff: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if self.is_bomb() {
            if let Some(spell) = self.spell {
                obj.cast_spell(spell, obj.guid, None, cx)?;
            }
            obj.set_loot_state(LootState::JustDeactivated, None, cx);
            return Ok(());
        }
        let Some(target) = obj.loot_state_unit else {
            return Ok(());
        };
        if let Some(spell) = self.spell {
            obj.cast_spell(spell, obj.guid, Some(target), cx)?;
        }
        obj.cooldown_ms = cx.now_ms()? + self.recast_cooldown_ms();

        if self.charges == 1 {
            obj.set_loot_state(LootState::JustDeactivated, None, cx);
        } else {
            obj.set_loot_state(LootState::Ready, None, cx);
        }
        Ok(())
    }
}
