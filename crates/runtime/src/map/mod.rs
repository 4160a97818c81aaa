//! Single-map simulation driver.
//!
//! [`WorldMap`] owns every game object instance and creature of one map
//! and applies the side effects their controllers emit. A tick runs, in
//! order: object lifecycles, their events, creature AI and movement, the
//! respawn sweep, removal of deleted instances, then expiry of boundary
//! markers.
mod creatures;
mod markers;
mod objects;
mod respawn;
mod units;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use world_content::{CreatureSpawn, ObjectSpawn, SpawnTable};
use world_core::{
    BoundaryRegistry, CreateParams, GameClock, GameError, GameObjectInstance, Interactor, MapId,
    Marker, ObjectGuid, Position, SpawnId, SpawnStore, UseOutcome, WorldEnv, WorldOracle,
};

use crate::error::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::threat::{FactionId, ThreatManager};

pub use creatures::CreatureSlot;
pub use markers::{MarkerBoard, PlacedMarker};
pub use objects::ObjectNotice;
pub use units::{PlayerState, UnitIndex};

use creatures::CreatureMap;
use objects::ObjectSet;
use units::MapView;

/// Guids handed out by the map start here; lower values are left to
/// players.
pub const FIRST_MAP_GUID: u64 = 0x1_0000;

/// Collaborators shared by every map of a runtime.
#[derive(Clone, Copy)]
pub struct MapServices<'a> {
    pub oracles: &'a OracleManager,
    pub clock: &'a dyn GameClock,
    pub store: &'a dyn SpawnStore,
}

impl<'s> MapServices<'s> {
    fn env<'a>(&self, world: &'a dyn WorldOracle) -> WorldEnv<'a>
    where
        's: 'a,
    {
        self.oracles.env(self.clock, world, self.store)
    }
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub objects_updated: usize,
    pub object_errors: usize,
    pub object_events: usize,
    pub creatures_updated: usize,
    pub respawned: usize,
    pub removed: usize,
    pub markers_expired: usize,
    pub notices: Vec<ObjectNotice>,
}

/// Outcome of the initial population of a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub objects: usize,
    pub creatures: usize,
    /// Placements still waiting on a persisted respawn time.
    pub deferred: usize,
    pub failed: usize,
}

/// One simulated map.
pub struct WorldMap {
    id: MapId,
    objects: ObjectSet,
    creatures: CreatureMap,
    units: UnitIndex,
    threat: ThreatManager,
    boundaries: BoundaryRegistry,
    markers: MarkerBoard,
    object_spawns: BTreeMap<SpawnId, ObjectSpawn>,
    creature_spawns: Vec<CreatureSpawn>,
    next_guid: u64,
    follow_distance: f32,
}

impl WorldMap {
    pub fn new(id: MapId, spawns: &SpawnTable, boundaries: BoundaryRegistry) -> Self {
        Self {
            id,
            objects: ObjectSet::default(),
            creatures: CreatureMap::new(),
            units: UnitIndex::new(),
            threat: ThreatManager::with_default_factions(),
            boundaries,
            markers: MarkerBoard::new(),
            object_spawns: spawns
                .objects_on(id)
                .filter(|spawn| !spawn.spawn.spawn_id.is_none())
                .map(|spawn| (spawn.spawn.spawn_id, spawn.clone()))
                .collect(),
            creature_spawns: spawns.creatures_on(id).cloned().collect(),
            next_guid: FIRST_MAP_GUID,
            follow_distance: world_core::WorldConfig::DEFAULT_FOLLOW_DISTANCE,
        }
    }

    pub fn with_follow_distance(mut self, distance: f32) -> Self {
        self.follow_distance = distance;
        self
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    fn allocate_guid(next: &mut u64) -> ObjectGuid {
        let guid = ObjectGuid(*next);
        *next += 1;
        guid
    }

    /// Spawns every placement of the map.
    ///
    /// Object placements whose respawn record is still in the future are
    /// left to the respawn sweep.
    pub fn populate(&mut self, services: &MapServices<'_>) -> PopulateReport {
        let mut report = PopulateReport::default();
        let now = services.clock.now();

        let placements: Vec<ObjectSpawn> = self.object_spawns.values().cloned().collect();
        for spawn in placements {
            match services.store.load(spawn.spawn.spawn_id) {
                Ok(Some(record)) if record.respawn_time > now => {
                    report.deferred += 1;
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(spawn = %spawn.spawn.spawn_id, code = err.error_code(), error = %err, "respawn record unreadable; spawning");
                }
            }
            match self.spawn_placement(&spawn, services) {
                Ok(_) => report.objects += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(spawn = %spawn.spawn.spawn_id, entry = spawn.entry, error = %err, "placement skipped");
                }
            }
        }

        let creature_spawns = std::mem::take(&mut self.creature_spawns);
        for spawn in &creature_spawns {
            self.spawn_creature(spawn);
            report.creatures += 1;
        }
        self.creature_spawns = creature_spawns;

        info!(
            map = self.id.0,
            objects = report.objects,
            creatures = report.creatures,
            deferred = report.deferred,
            failed = report.failed,
            "map populated"
        );
        report
    }

    fn spawn_placement(&mut self, spawn: &ObjectSpawn, services: &MapServices<'_>) -> Result<ObjectGuid> {
        let next_guid = &mut self.next_guid;
        let guid = Self::allocate_guid(next_guid);
        let view = MapView::new(&self.units, &self.threat);
        let env = services.env(&view);
        let guid = self
            .objects
            .spawn(spawn.create_params(guid), || Self::allocate_guid(next_guid), &env)?;
        Ok(guid)
    }

    /// Advances the map by `diff` milliseconds.
    pub fn tick(&mut self, diff: u32, services: &MapServices<'_>) -> TickReport {
        let mut report = TickReport::default();

        let phase = {
            let view = MapView::new(&self.units, &self.threat);
            let env = services.env(&view);
            self.objects.update_all(diff, &env)
        };
        report.objects_updated = phase.updated;
        report.object_errors = phase.errors;
        report.object_events = phase.events;

        report.creatures_updated = self.update_creatures(diff);
        report.respawned = self.sweep_respawns(services);
        report.removed = self.objects.remove_pending();
        report.markers_expired = self.markers.advance(diff);
        report.notices = self.objects.take_notices();

        debug_assert!(
            self.creatures
                .values()
                .all(|slot| slot.ai.perception_guard().is_at_rest()),
            "perception guard left held after a tick"
        );
        report
    }

    // ===== objects =====

    pub fn object(&self, guid: ObjectGuid) -> Option<&GameObjectInstance> {
        self.objects.get(guid)
    }

    pub fn object_by_spawn(&self, spawn_id: SpawnId) -> Option<&GameObjectInstance> {
        self.objects.by_spawn(spawn_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObjectInstance> + '_ {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Places a transient object summoned by `owner`.
    pub fn summon_object(
        &mut self,
        entry: u32,
        position: Position,
        owner: ObjectGuid,
        spell_id: Option<u32>,
        services: &MapServices<'_>,
    ) -> Result<ObjectGuid> {
        let next_guid = &mut self.next_guid;
        let guid = Self::allocate_guid(next_guid);
        let params = CreateParams::new(guid, entry, position).summoned_by(owner, spell_id);
        let view = MapView::new(&self.units, &self.threat);
        let env = services.env(&view);
        let guid = self
            .objects
            .spawn(params, || Self::allocate_guid(next_guid), &env)?;
        Ok(guid)
    }

    pub fn use_object(
        &mut self,
        guid: ObjectGuid,
        user: Interactor,
        services: &MapServices<'_>,
    ) -> Result<UseOutcome> {
        let outcome = self.object_call(guid, services, |instance, cx| instance.use_object(user, cx))?;
        debug!(%guid, user = %user.guid, %outcome, "object used");
        Ok(outcome)
    }

    pub fn despawn_object(
        &mut self,
        guid: ObjectGuid,
        delay_ms: u32,
        force_respawn_secs: u32,
        services: &MapServices<'_>,
    ) -> Result<()> {
        self.object_call(guid, services, |instance, cx| {
            instance.despawn_or_unsummon(delay_ms, force_respawn_secs, cx)
        })
    }

    /// Brings a despawned default spawn back on the next tick.
    pub fn respawn_object(&mut self, guid: ObjectGuid, services: &MapServices<'_>) -> Result<()> {
        self.object_call(guid, services, |instance, cx| instance.respawn(cx))
    }

    /// Applies `delta` health to a destructible building.
    pub fn damage_object(
        &mut self,
        guid: ObjectGuid,
        delta: i32,
        attacker: Option<ObjectGuid>,
        services: &MapServices<'_>,
    ) -> Result<()> {
        self.object_call(guid, services, |instance, cx| {
            instance.modify_health(delta, attacker, cx);
            Ok(())
        })
    }

    pub fn release_loot(
        &mut self,
        guid: ObjectGuid,
        fully_looted: bool,
        services: &MapServices<'_>,
    ) -> Result<()> {
        self.object_call(guid, services, |instance, cx| {
            instance.release_loot(fully_looted, cx);
            Ok(())
        })
    }

    pub fn start_loot_roll(
        &mut self,
        guid: ObjectGuid,
        group: u64,
        duration_ms: u32,
        services: &MapServices<'_>,
    ) -> Result<()> {
        self.object_call(guid, services, |instance, _| {
            instance.start_loot_roll(group, duration_ms);
            Ok(())
        })
    }

    fn object_call<R>(
        &mut self,
        guid: ObjectGuid,
        services: &MapServices<'_>,
        op: impl FnOnce(
            &mut GameObjectInstance,
            &mut world_core::ObjectContext<'_>,
        ) -> std::result::Result<R, world_core::LifecycleError>,
    ) -> Result<R> {
        let view = MapView::new(&self.units, &self.threat);
        let env = services.env(&view);
        match self.objects.with_instance(guid, &env, op) {
            Some(result) => Ok(result?),
            None => Err(RuntimeError::UnknownObject(guid)),
        }
    }

    // ===== players =====

    pub fn units(&self) -> &UnitIndex {
        &self.units
    }

    pub fn threat(&self) -> &ThreatManager {
        &self.threat
    }

    /// Enters a player and lets nearby creatures notice it.
    pub fn add_player(&mut self, guid: ObjectGuid, position: Position) {
        self.units.upsert_player(guid, PlayerState::at(position));
        self.threat.set_faction(guid, FactionId::PLAYERS);
        debug!(player = %guid, map = self.id.0, "player entered map");
        self.notify_player_moved(guid);
    }

    pub fn move_player(&mut self, guid: ObjectGuid, position: Position) -> Result<()> {
        let player = self
            .units
            .player_mut(guid)
            .ok_or(RuntimeError::UnknownPlayer(guid))?;
        player.position = position;
        self.notify_player_moved(guid);
        Ok(())
    }

    pub fn set_player_stealth(&mut self, guid: ObjectGuid, stealthed: bool) -> Result<()> {
        let player = self
            .units
            .player_mut(guid)
            .ok_or(RuntimeError::UnknownPlayer(guid))?;
        player.stealthed = stealthed;
        Ok(())
    }

    /// Seats a player on creature `vehicle`, or dismounts it with `None`.
    pub fn set_player_vehicle(&mut self, guid: ObjectGuid, vehicle: Option<ObjectGuid>) -> Result<()> {
        if let Some(vehicle) = vehicle
            && !self.creatures.contains_key(&vehicle)
        {
            return Err(RuntimeError::UnknownCreature(vehicle));
        }
        let player = self
            .units
            .player_mut(guid)
            .ok_or(RuntimeError::UnknownPlayer(guid))?;
        player.vehicle = vehicle;
        Ok(())
    }

    /// Drops a player; creatures left without a hostile evade.
    pub fn remove_player(&mut self, guid: ObjectGuid) -> Result<()> {
        self.units
            .remove_player(guid)
            .ok_or(RuntimeError::UnknownPlayer(guid))?;
        let engaged = self.threat.threatened_by(guid);
        self.threat.remove_unit(guid);
        for creature in engaged {
            self.retarget_or_evade(creature);
        }
        debug!(player = %guid, map = self.id.0, "player left map");
        Ok(())
    }

    // ===== boundaries =====

    pub fn boundaries(&self) -> &BoundaryRegistry {
        &self.boundaries
    }

    /// Mutable registry; handles held by creatures see replacements and
    /// removals on their next check.
    pub fn boundaries_mut(&mut self) -> &mut BoundaryRegistry {
        &mut self.boundaries
    }

    /// Boundary markers still shown; each expires with the map tick.
    pub fn markers(&self) -> &MarkerBoard {
        &self.markers
    }

    pub fn take_markers(&mut self) -> Vec<Marker> {
        self.markers.take()
    }
}
