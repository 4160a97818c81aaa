//! Respawn sweep: recreates modern-mode spawns whose timer ran out.
use tracing::{debug, warn};
use world_core::{
    GameError, LinkedRespawn, RespawnRecord, RespawnScheduler, RngOracle, Timestamp, WorldConfig,
    compute_seed,
};

use super::units::MapView;
use super::{MapServices, WorldMap};

/// Seed context of the jitter rolled when a sweep defers a dependant.
const SWEEP_JITTER_SEED_CONTEXT: u32 = 0x5357_5031;

impl WorldMap {
    /// Walks due respawn records and brings their spawns back.
    ///
    /// A record whose instance is still resident belongs to a
    /// compatibility-mode object that handles its own respawn. Spawns gated
    /// by a dead master are pushed back instead of respawned.
    pub(super) fn sweep_respawns(&mut self, services: &MapServices<'_>) -> usize {
        let now = services.clock.now();
        let due = match services.store.due(now) {
            Ok(due) => due,
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "respawn sweep skipped");
                return 0;
            }
        };
        let scheduler = RespawnScheduler::new(services.store);
        let mut respawned = 0;

        for record in due {
            let spawn_id = record.spawn_id;
            if self.objects.has_live_spawn(spawn_id) {
                continue;
            }
            match scheduler.resolve_linked_respawn(spawn_id) {
                Ok(None) => {}
                Ok(Some(link)) => {
                    let at = self.deferred_respawn_time(&record, link, now, services);
                    debug!(spawn = %spawn_id, at = %at, ?link, "respawn deferred by master");
                    if let Err(err) = scheduler.schedule(RespawnRecord { respawn_time: at, ..record }, false) {
                        warn!(spawn = %spawn_id, code = err.error_code(), error = %err, "deferred respawn not saved");
                    }
                    continue;
                }
                Err(err) => {
                    warn!(spawn = %spawn_id, code = err.error_code(), error = %err, "master link unreadable");
                    continue;
                }
            }

            let Some(spawn) = self.object_spawns.get(&spawn_id).cloned() else {
                warn!(spawn = %spawn_id, map = self.id.0, "respawn record has no placement; dropped");
                if let Err(err) = scheduler.clear(spawn_id) {
                    warn!(spawn = %spawn_id, error = %err, "orphan respawn record not cleared");
                }
                continue;
            };

            let next_guid = &mut self.next_guid;
            let guid = Self::allocate_guid(next_guid);
            let view = MapView::new(&self.units, &self.threat);
            let env = services.env(&view);
            match self
                .objects
                .spawn(spawn.create_params(guid), || Self::allocate_guid(next_guid), &env)
            {
                Ok(guid) => {
                    if let Err(err) = scheduler.clear(spawn_id) {
                        warn!(spawn = %spawn_id, error = %err, "respawn record not cleared");
                    }
                    debug!(spawn = %spawn_id, %guid, "spawn respawned");
                    respawned += 1;
                }
                Err(err) => warn!(
                    spawn = %spawn_id,
                    code = err.error_code(),
                    error = %err,
                    "respawn failed; record kept"
                ),
            }
        }
        respawned
    }

    fn deferred_respawn_time(
        &self,
        record: &RespawnRecord,
        link: LinkedRespawn,
        now: Timestamp,
        services: &MapServices<'_>,
    ) -> Timestamp {
        match link {
            LinkedRespawn::SelfLinked => now + WorldConfig::SELF_LINKED_RESPAWN_DELAY_SECS,
            LinkedRespawn::Master(master_time) => {
                let (min, max) = WorldConfig::LINKED_RESPAWN_JITTER_SECS;
                let seed = compute_seed(
                    services.oracles.config().map_seed,
                    now.as_secs(),
                    record.spawn_id.0,
                    SWEEP_JITTER_SEED_CONTEXT,
                );
                let jitter = services.oracles.rng().range(seed, min, max);
                RespawnScheduler::reschedule_after_master(now, master_time, jitter)
            }
        }
    }
}
