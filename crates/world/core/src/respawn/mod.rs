//! Respawn scheduling: delay scaling, persistence intent and master links.
//!
//! A spawn may be linked to a master spawn. While the master is dead its
//! dependants copy the master's respawn time (plus jitter) instead of
//! reappearing on their own. A spawn linked to itself never respawns: every
//! time its timer expires it is pushed back by a week.
mod scheduler;

pub use scheduler::{LinkedRespawn, RespawnScheduler, ScalingPolicy, compute_respawn_delay};

use crate::state::{PoolId, SpawnId, Timestamp};

/// Persisted scheduling state of one spawn.
///
/// Created on the first despawn that needs a respawn delay; removed when
/// the spawn reappears or is permanently deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespawnRecord {
    pub spawn_id: SpawnId,
    /// Template entry to recreate the instance from.
    pub entry: u32,
    pub respawn_time: Timestamp,
    pub master: Option<SpawnId>,
    pub pool: Option<PoolId>,
}

impl RespawnRecord {
    pub fn new(spawn_id: SpawnId, entry: u32, respawn_time: Timestamp) -> Self {
        Self {
            spawn_id,
            entry,
            respawn_time,
            master: None,
            pool: None,
        }
    }

    pub fn with_master(mut self, master: Option<SpawnId>) -> Self {
        self.master = master;
        self
    }

    pub fn with_pool(mut self, pool: Option<PoolId>) -> Self {
        self.pool = pool;
        self
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.respawn_time <= now
    }
}
