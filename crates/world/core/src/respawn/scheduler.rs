use crate::config::{RespawnScalingMode, WorldConfig};
use crate::env::{SpawnStore, StoreError};
use crate::state::{SpawnId, Timestamp};

use super::RespawnRecord;

/// Delay scaling applied when a spawn is scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalingPolicy {
    Fixed,
    /// Shrinks delays as `rate / population`, never below `minimum_secs`.
    PopulationScaled {
        rate: f32,
        minimum_secs: u32,
        population: u32,
    },
}

impl ScalingPolicy {
    pub fn from_config(config: &WorldConfig, population: u32) -> Self {
        match config.respawn_scaling {
            RespawnScalingMode::Off => ScalingPolicy::Fixed,
            RespawnScalingMode::Population => ScalingPolicy::PopulationScaled {
                rate: config.respawn_scaling_rate,
                minimum_secs: config.respawn_scaling_minimum_secs,
                population,
            },
        }
    }
}

/// Effective respawn delay in seconds for `base_secs` under `policy`.
pub fn compute_respawn_delay(base_secs: u32, policy: &ScalingPolicy) -> u32 {
    match *policy {
        ScalingPolicy::Fixed => base_secs,
        ScalingPolicy::PopulationScaled {
            rate,
            minimum_secs,
            population,
        } => {
            if base_secs <= minimum_secs || population == 0 {
                return base_secs;
            }
            let factor = rate / population as f32;
            if factor >= 1.0 {
                return base_secs;
            }
            let scaled = (base_secs as f32 * factor).ceil() as u32;
            scaled.max(minimum_secs)
        }
    }
}

/// Result of resolving a spawn's master link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkedRespawn {
    /// The spawn is linked to itself and must never respawn.
    SelfLinked,
    /// The master is dead and comes back at the given time.
    Master(Timestamp),
}

/// Schedules respawns against a storage collaborator.
pub struct RespawnScheduler<'a> {
    store: &'a dyn SpawnStore,
}

impl<'a> RespawnScheduler<'a> {
    pub fn new(store: &'a dyn SpawnStore) -> Self {
        Self { store }
    }

    /// Records `record`; `persist_now` requests an immediate durable write.
    pub fn schedule(&self, record: RespawnRecord, persist_now: bool) -> Result<(), StoreError> {
        tracing::debug!(
            spawn = %record.spawn_id,
            at = %record.respawn_time,
            persist_now,
            "respawn scheduled"
        );
        self.store.save(&record, persist_now)
    }

    pub fn clear(&self, spawn_id: SpawnId) -> Result<(), StoreError> {
        self.store.delete(spawn_id)
    }

    /// Returns the gating state of `spawn_id`'s master, if it has a dead one.
    pub fn resolve_linked_respawn(
        &self,
        spawn_id: SpawnId,
    ) -> Result<Option<LinkedRespawn>, StoreError> {
        let Some(master) = self.store.master_of(spawn_id)? else {
            return Ok(None);
        };
        if master == spawn_id {
            return Ok(Some(LinkedRespawn::SelfLinked));
        }
        Ok(self
            .store
            .load(master)?
            .filter(|record| record.respawn_time.is_set())
            .map(|record| LinkedRespawn::Master(record.respawn_time)))
    }

    /// Respawn time of a dependant whose master comes back at `master_time`.
    pub fn reschedule_after_master(now: Timestamp, master_time: Timestamp, jitter_secs: u32) -> Timestamp {
        now.max(master_time) + jitter_secs
    }
}
