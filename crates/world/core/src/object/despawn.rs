use crate::respawn::{RespawnRecord, RespawnScheduler};
use crate::state::Timestamp;

use super::context::{ObjectContext, ObjectEvent};
use super::error::LifecycleError;
use super::state::{GoState, LootState};
use super::{GameObjectInstance, RespawnMode};

impl GameObjectInstance {
    /// Despawns after `delay_ms`, or now when zero.
    ///
    /// A non-zero `force_respawn_secs` overrides the respawn delay of a
    /// persisted spawn. When several delayed despawns are requested the
    /// earliest wins.
    pub fn despawn_or_unsummon(
        &mut self,
        delay_ms: u32,
        force_respawn_secs: u32,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if delay_ms > 0 {
            if self.despawn_delay_ms == 0 || self.despawn_delay_ms > delay_ms {
                self.despawn_delay_ms = delay_ms;
                self.despawn_respawn_secs = force_respawn_secs;
            }
            return Ok(());
        }

        if !self.spawn.spawn_id.is_none() {
            let delay = if force_respawn_secs > 0 {
                force_respawn_secs
            } else {
                self.respawn_delay_secs
            };
            if delay > 0 && self.spawned_by_default {
                self.respawn_time = cx.now()? + delay;
                self.save_respawn_time(0, true, cx)?;
            }
        }
        self.delete(cx);
        Ok(())
    }

    /// Removes the instance from its map for good.
    pub fn delete(&mut self, cx: &mut ObjectContext<'_>) {
        if self.removed {
            return;
        }
        if let Some(trap) = self.linked_trap.take() {
            cx.emit(ObjectEvent::DespawnLinkedTrap { trap });
        }
        self.set_loot_state(LootState::NotReady, None, cx);
        if let Some(owner) = self.owner {
            cx.emit(ObjectEvent::OwnerReleased { owner });
        }
        cx.emit(ObjectEvent::DespawnAnimation);
        self.set_go_state(GoState::Ready, cx);
        self.flags = self.template.flags;
        self.removed = true;
        tracing::debug!(guid = %self.guid, spawn = %self.spawn.spawn_id, "game object deleted");

        if let Some(pool) = self.spawn.pool {
            cx.emit(ObjectEvent::PoolUpdate { pool });
        }
        cx.emit(ObjectEvent::RemoveFromWorld);
    }

    /// Sets both the respawn delay and the absolute timer, `secs` from now.
    ///
    /// Zero clears the timer.
    pub fn set_respawn_time(&mut self, secs: u32, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        self.respawn_time = if secs > 0 {
            cx.now()? + secs
        } else {
            Timestamp::ZERO
        };
        self.respawn_delay_secs = secs;
        if secs > 0 && !self.spawned_by_default {
            cx.emit(ObjectEvent::VisibilityUpdate);
        }
        Ok(())
    }

    /// Makes a despawned default spawn come back on the next tick.
    pub fn respawn(&mut self, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        if self.spawned_by_default && self.respawn_time.is_set() {
            self.respawn_time = cx.now()?;
            self.clear_respawn_record(cx)?;
        }
        Ok(())
    }

    /// Writes the respawn record of a persisted default spawn.
    ///
    /// A non-zero `force_delay_secs` stores `now + force_delay_secs` instead
    /// of the current timer. Compatibility-mode instances always persist
    /// immediately. Storage failures are logged and swallowed.
    pub fn save_respawn_time(
        &mut self,
        force_delay_secs: u32,
        persist_now: bool,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if self.spawn.spawn_id.is_none() || !self.spawned_by_default {
            return Ok(());
        }
        let now = cx.now()?;
        if force_delay_secs == 0 && self.respawn_time <= now {
            return Ok(());
        }
        let at = if force_delay_secs > 0 {
            now + force_delay_secs
        } else {
            self.respawn_time
        };
        let persist_now = persist_now || self.respawn_mode == RespawnMode::Compatibility;
        let record = RespawnRecord::new(self.spawn.spawn_id, self.template.entry, at)
            .with_master(self.spawn.master)
            .with_pool(self.spawn.pool);

        let scheduler = RespawnScheduler::new(cx.env().spawns()?);
        if let Err(err) = scheduler.schedule(record, persist_now) {
            tracing::warn!(spawn = %self.spawn.spawn_id, %err, "failed to save respawn time");
        }
        Ok(())
    }

    pub(crate) fn clear_respawn_record(&self, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        if self.spawn.spawn_id.is_none() {
            return Ok(());
        }
        let scheduler = RespawnScheduler::new(cx.env().spawns()?);
        if let Err(err) = scheduler.clear(self.spawn.spawn_id) {
            tracing::warn!(spawn = %self.spawn.spawn_id, %err, "failed to clear respawn record");
        }
        Ok(())
    }
}
