use std::sync::Arc;

use crate::config::WorldConfig;
use crate::env::compute_seed;
use crate::state::Timestamp;
use crate::respawn::{LinkedRespawn, RespawnScheduler, ScalingPolicy, compute_respawn_delay};

use super::context::{ObjectContext, ObjectEvent};
use super::error::LifecycleError;
use super::kinds::{Arming, Disposal, RespawnReset};
use super::state::LootState;
use super::template::TemplateKind;
use super::{GameObjectInstance, RespawnMode};

/// Seed context for the jitter applied after a linked master respawns.
const LINKED_JITTER_SEED_CONTEXT: u32 = 0x4c4e_4b31;

impl GameObjectInstance {
    /// Advances the lifecycle by `diff` milliseconds.
    pub fn update(&mut self, diff: u32, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        if self.removed {
            return Ok(());
        }
        self.ai.update(diff);

        if self.despawn_delay_ms > 0 {
            if self.despawn_delay_ms > diff {
                self.despawn_delay_ms -= diff;
            } else {
                self.despawn_delay_ms = 0;
                let force_secs = self.despawn_respawn_secs;
                self.despawn_or_unsummon(0, force_secs, cx)?;
                return Ok(());
            }
        }

        let template = Arc::clone(&self.template);
        let hooks = template.kind.hooks();
        match self.loot_state {
            LootState::NotReady => {
                if hooks.arm(self, diff, cx)? == Arming::Armed {
                    self.update_ready(cx)?;
                }
            }
            LootState::Ready => self.update_ready(cx)?,
            LootState::Activated => hooks.activated(self, diff, cx)?,
            LootState::JustDeactivated => self.update_deactivated(cx)?,
        }
        Ok(())
    }

    fn update_ready(&mut self, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        let template = Arc::clone(&self.template);
        let hooks = template.kind.hooks();
        let now = cx.now()?;

        match self.respawn_mode {
            RespawnMode::Compatibility => {
                if self.respawn_time.is_set() && self.respawn_time <= now {
                    if !self.spawn.spawn_id.is_none() && self.defer_to_linked_master(cx)? {
                        return Ok(());
                    }

                    self.respawn_time = Timestamp::ZERO;
                    self.use_count = 0;
                    self.unique_users.clear();
                    self.clear_respawn_record(cx)?;

                    if hooks.on_respawn(self, cx)? == RespawnReset::Deactivated {
                        return Ok(());
                    }
                    if !self.spawned_by_default {
                        self.set_loot_state(LootState::JustDeactivated, None, cx);
                        return Ok(());
                    }
                    self.ai.reset();
                    tracing::debug!(guid = %self.guid, spawn = %self.spawn.spawn_id, "game object respawned");
                    match self.spawn.pool {
                        Some(pool) => cx.emit(ObjectEvent::PoolUpdate { pool }),
                        None => cx.emit(ObjectEvent::AddedToMap),
                    }
                }
            }
            RespawnMode::Modern => {
                if self.respawn_time.is_set() {
                    self.save_respawn_time(0, false, cx)?;
                }
            }
        }

        if self.is_spawned() {
            hooks.ready(self, cx)?;
        }
        Ok(())
    }

    /// Pushes the respawn back while a linked master is still dead.
    /// Returns true when the respawn was deferred.
    fn defer_to_linked_master(&mut self, cx: &mut ObjectContext<'_>) -> Result<bool, LifecycleError> {
        let env = *cx.env();
        let scheduler = RespawnScheduler::new(env.spawns()?);
        let linked = match scheduler.resolve_linked_respawn(self.spawn.spawn_id) {
            Ok(linked) => linked,
            Err(err) => {
                tracing::warn!(spawn = %self.spawn.spawn_id, %err, "linked respawn lookup failed");
                None
            }
        };
        let now = cx.now()?;
        match linked {
            None => Ok(false),
            Some(LinkedRespawn::SelfLinked) => {
                tracing::warn!(spawn = %self.spawn.spawn_id, "spawn is linked to itself; delaying respawn by a week");
                self.respawn_time = now + WorldConfig::SELF_LINKED_RESPAWN_DELAY_SECS;
                self.save_respawn_time(0, true, cx)?;
                Ok(true)
            }
            Some(LinkedRespawn::Master(master_time)) => {
                let (min, max) = WorldConfig::LINKED_RESPAWN_JITTER_SECS;
                let seed = compute_seed(
                    env.config()?.map_seed,
                    now.as_secs(),
                    self.spawn.spawn_id.0,
                    LINKED_JITTER_SEED_CONTEXT,
                );
                let jitter = env.rng()?.range(seed, min, max);
                self.respawn_time = RespawnScheduler::reschedule_after_master(now, master_time, jitter);
                tracing::debug!(spawn = %self.spawn.spawn_id, at = %self.respawn_time, "respawn deferred to linked master");
                self.save_respawn_time(0, true, cx)?;
                Ok(true)
            }
        }
    }

    fn update_deactivated(&mut self, cx: &mut ObjectContext<'_>) -> Result<(), LifecycleError> {
        if let Some(trap) = self.linked_trap.take() {
            cx.emit(ObjectEvent::DespawnLinkedTrap { trap });
        }

        let template = Arc::clone(&self.template);
        if template.kind.hooks().deactivated(self, cx)? == Disposal::Keep {
            return Ok(());
        }

        if self.spell_id.is_some() || self.owner.is_some() {
            // Temporary summons: persistent chests stay until looted again.
            if self.spell_id.is_none()
                && self.respawn_time.is_set()
                && matches!(&template.kind, TemplateKind::Chest(data) if !data.consumable)
            {
                cx.emit(ObjectEvent::VisibilityUpdate);
                self.set_loot_state(LootState::Ready, None, cx);
                return Ok(());
            }
            self.respawn_time = Timestamp::ZERO;
            self.delete(cx);
            return Ok(());
        }

        self.set_loot_state(LootState::NotReady, None, cx);

        if template.despawn_at_action() || self.anim_progress > 0 {
            cx.emit(ObjectEvent::DespawnAnimation);
            self.anim_progress = 0;
            self.flags = template.flags;
        }

        if self.respawn_delay_secs == 0 {
            return Ok(());
        }

        if !self.spawned_by_default {
            self.respawn_time = Timestamp::ZERO;
            if self.spawn.spawn_id.is_none() {
                self.delete(cx);
            } else {
                cx.emit(ObjectEvent::DestroyForNearbyPlayers);
            }
            return Ok(());
        }

        let config = cx.env().config()?;
        let population = cx.env().world()?.zone_population(&self.position);
        let delay = compute_respawn_delay(
            self.respawn_delay_secs,
            &ScalingPolicy::from_config(config, population),
        );
        self.respawn_time = cx.now()? + delay;

        if config.save_respawn_time_immediately {
            self.save_respawn_time(0, true, cx)?;
        }

        if self.respawn_mode == RespawnMode::Modern {
            self.save_respawn_time(0, false, cx)?;
            self.removed = true;
            cx.emit(ObjectEvent::RemoveFromWorld);
            return Ok(());
        }

        cx.emit(ObjectEvent::DestroyForNearbyPlayers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::super::testing::*;
    use super::super::{CreateError, ObjectKind, SpawnInfo};
    use super::*;
    use crate::config::WorldConfig;
    use crate::env::SpawnStore;
    use crate::object::{Interactor, UseOutcome};
    use crate::object::state::{GoFlags, GoState};
    use crate::state::{ObjectGuid, PoolId, Position, SpawnId};

    fn tick(object: &mut GameObjectInstance, diff: u32, cx: &mut ObjectContext<'_>) {
        object.update(diff, cx).unwrap();
    }

    fn casts(cx: &ObjectContext<'_>) -> Vec<(u32, ObjectGuid, Option<ObjectGuid>)> {
        cx.events()
            .iter()
            .filter_map(|event| match *event {
                ObjectEvent::CastSpell {
                    spell,
                    caster,
                    target,
                } => Some((spell, caster, target)),
                _ => None,
            })
            .collect()
    }

    // ===== creation =====

    #[test]
    fn create_rejects_bad_input() {
        let fx = Fixture::new();
        let env = fx.env();
        let ai = || Box::new(super::super::NullObjectAi);

        let unknown = GameObjectInstance::create(fx.params(9_999), &env, ai());
        assert_eq!(unknown.unwrap_err(), CreateError::UnknownTemplate(9_999));

        let mut params = fx.params(DOOR);
        params.position = Position::new(f32::NAN, 0.0, 0.0);
        assert!(matches!(
            GameObjectInstance::create(params, &env, ai()),
            Err(CreateError::InvalidPosition { entry: DOOR, .. })
        ));

        let manual = GameObjectInstance::create(fx.params(MAP_OBJ_TRANSPORT), &env, ai());
        assert_eq!(
            manual.unwrap_err(),
            CreateError::ManualCreationDisallowed(MAP_OBJ_TRANSPORT)
        );
    }

    #[test]
    fn modern_mode_without_persisted_spawn_falls_back() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::transient().with_compatibility_mode(false));
        let object = fx.spawn_with(params, &mut cx);
        assert_eq!(object.respawn_mode(), RespawnMode::Compatibility);

        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(SpawnId(3)))
            .spawned_by_default(false);
        let object = fx.spawn_with(params, &mut cx);
        assert_eq!(object.respawn_mode(), RespawnMode::Compatibility);

        let params = fx.params(GENERIC).with_spawn(SpawnInfo::persisted(SpawnId(4)));
        let object = fx.spawn_with(params, &mut cx);
        assert_eq!(object.respawn_mode(), RespawnMode::Modern);
    }

    #[test]
    fn fishing_hole_is_stocked_on_creation() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let hole = fx.spawn(FISHING_HOLE, &mut cx);
        let ObjectKind::FishingHole { remaining_opens } = *hole.kind() else {
            panic!("fishing hole payload expected");
        };
        assert!((2..=4).contains(&remaining_opens));
    }

    // ===== respawn timers =====

    #[test]
    fn expired_non_default_spawn_is_removed_for_good() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let params = fx.params(GENERIC).spawned_by_default(false);
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_loot_state(LootState::Ready, None, &mut cx);
        object.set_respawn_time(30, &mut cx).unwrap();
        assert!(object.is_spawned());

        fx.clock.advance_secs(31);
        tick(&mut object, 100, &mut cx);
        assert_eq!(object.loot_state(), LootState::JustDeactivated);

        tick(&mut object, 100, &mut cx);
        assert!(object.is_removed());
        assert!(!object.respawn_time().is_set());
        assert!(cx.events().contains(&ObjectEvent::RemoveFromWorld));
        assert!(fx.store.records.lock().unwrap().is_empty());
    }

    #[test]
    fn self_linked_spawn_never_respawns() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let spawn = SpawnId(7);
        fx.store.links.lock().unwrap().insert(spawn, spawn);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(spawn).with_compatibility_mode(true));
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_loot_state(LootState::Ready, None, &mut cx);
        object.set_respawn_time(10, &mut cx).unwrap();

        for _ in 0..3 {
            fx.clock.advance_secs(11);
            tick(&mut object, 1_000, &mut cx);
        }
        let week = fx.now() + WorldConfig::SELF_LINKED_RESPAWN_DELAY_SECS;
        assert!(object.respawn_time() > fx.now());
        assert!(object.respawn_time() <= week);
        assert!(!object.is_spawned());
        assert!(!cx.events().contains(&ObjectEvent::AddedToMap));
        assert_eq!(
            fx.store.record(spawn).map(|record| record.respawn_time),
            Some(object.respawn_time())
        );
    }

    #[test]
    fn dependant_waits_for_dead_master() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let (dependant, master) = (SpawnId(8), SpawnId(9));
        fx.store.links.lock().unwrap().insert(dependant, master);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(dependant).with_compatibility_mode(true));
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_loot_state(LootState::Ready, None, &mut cx);
        object.set_respawn_time(10, &mut cx).unwrap();

        fx.clock.advance_secs(11);
        let master_time = fx.now() + 100;
        fx.store
            .save(&crate::respawn::RespawnRecord::new(master, GENERIC, master_time), false)
            .unwrap();
        tick(&mut object, 1_000, &mut cx);

        let (min, max) = WorldConfig::LINKED_RESPAWN_JITTER_SECS;
        assert!(object.respawn_time() >= master_time + min);
        assert!(object.respawn_time() <= master_time + max);
        assert!(fx.store.record(dependant).is_some());
    }

    #[test]
    fn compatibility_spawn_comes_back_in_place() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let spawn = SpawnId(12);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(spawn).with_compatibility_mode(true))
            .with_respawn_delay(120);
        let ai = RecordingAi::default();
        let mut object = fx.spawn_scripted(params, Box::new(ai.clone()), &mut cx);
        object.set_loot_state(LootState::JustDeactivated, None, &mut cx);

        tick(&mut object, 100, &mut cx);
        assert_eq!(object.loot_state(), LootState::NotReady);
        assert!(!object.is_removed());
        assert!(cx.events().contains(&ObjectEvent::DestroyForNearbyPlayers));
        assert_eq!(object.respawn_time(), fx.now() + 120);

        fx.clock.advance_secs(121);
        cx.take_events();
        tick(&mut object, 100, &mut cx);
        assert_eq!(object.loot_state(), LootState::Ready);
        assert!(!object.respawn_time().is_set());
        assert!(object.is_spawned());
        assert_eq!(cx.events().last(), Some(&ObjectEvent::AddedToMap));
        assert!(ai.calls.lock().unwrap().contains(&"reset".to_string()));
        assert!(fx.store.record(spawn).is_none());
    }

    #[test]
    fn pooled_spawn_notifies_its_pool_on_return() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let params = fx.params(GENERIC).with_spawn(
            SpawnInfo::persisted(SpawnId(13))
                .with_compatibility_mode(true)
                .with_pool(PoolId(4)),
        );
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_respawn_time(5, &mut cx).unwrap();
        fx.clock.advance_secs(6);
        tick(&mut object, 100, &mut cx);
        assert!(cx
            .events()
            .contains(&ObjectEvent::PoolUpdate { pool: PoolId(4) }));
    }

    #[test]
    fn modern_despawn_persists_and_leaves_the_map() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let spawn = SpawnId(11);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(spawn))
            .with_respawn_delay(120);
        let mut object = fx.spawn_with(params, &mut cx);
        assert_eq!(object.respawn_mode(), RespawnMode::Modern);
        object.set_loot_state(LootState::JustDeactivated, None, &mut cx);

        tick(&mut object, 100, &mut cx);
        assert!(object.is_removed());
        assert_eq!(cx.events().last(), Some(&ObjectEvent::RemoveFromWorld));
        let record = fx.store.record(spawn).expect("respawn record");
        assert_eq!(record.respawn_time, fx.now() + 120);
        assert_eq!(record.entry, GENERIC);
        assert_eq!(fx.store.immediate_saves.load(Ordering::SeqCst), 0);

        // Removed instances ignore further ticks.
        cx.take_events();
        tick(&mut object, 100, &mut cx);
        assert!(cx.events().is_empty());
    }

    #[test]
    fn immediate_saves_follow_config() {
        let fx = Fixture::with_config(WorldConfig::new().with_immediate_saves(true));
        let mut cx = fx.context();
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(SpawnId(14)))
            .with_respawn_delay(60);
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_loot_state(LootState::JustDeactivated, None, &mut cx);
        tick(&mut object, 100, &mut cx);
        assert_eq!(fx.store.immediate_saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn population_scaling_shortens_respawn() {
        let fx = Fixture::with_config(WorldConfig::new().with_population_scaling(10.0, 10));
        fx.world.population.store(50, Ordering::SeqCst);
        let mut cx = fx.context();
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(SpawnId(15)))
            .with_respawn_delay(300);
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_loot_state(LootState::JustDeactivated, None, &mut cx);
        tick(&mut object, 100, &mut cx);
        assert_eq!(object.respawn_time(), fx.now() + 60);
    }

    #[test]
    fn delayed_despawn_waits_and_keeps_the_shortest_delay() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut object = fx.spawn(GENERIC, &mut cx);
        object.despawn_or_unsummon(2_000, 0, &mut cx).unwrap();
        object.despawn_or_unsummon(500, 0, &mut cx).unwrap();
        object.despawn_or_unsummon(5_000, 0, &mut cx).unwrap();

        tick(&mut object, 300, &mut cx);
        assert!(!object.is_removed());
        tick(&mut object, 300, &mut cx);
        assert!(object.is_removed());
    }

    #[test]
    fn forced_despawn_saves_override_delay() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let spawn = SpawnId(16);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(spawn))
            .with_respawn_delay(600);
        let mut object = fx.spawn_with(params, &mut cx);
        object.despawn_or_unsummon(0, 30, &mut cx).unwrap();
        assert!(object.is_removed());
        assert_eq!(
            fx.store.record(spawn).map(|record| record.respawn_time),
            Some(fx.now() + 30)
        );
    }

    #[test]
    fn respawn_clears_pending_timer() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let spawn = SpawnId(17);
        let params = fx
            .params(GENERIC)
            .with_spawn(SpawnInfo::persisted(spawn).with_compatibility_mode(true));
        let mut object = fx.spawn_with(params, &mut cx);
        object.set_respawn_time(300, &mut cx).unwrap();
        object.save_respawn_time(0, false, &mut cx).unwrap();
        assert!(fx.store.record(spawn).is_some());

        object.respawn(&mut cx).unwrap();
        assert_eq!(object.respawn_time(), fx.now());
        assert!(fx.store.record(spawn).is_none());
    }

    // ===== traps =====

    #[test]
    fn trap_waits_for_owner_then_fires_at_target() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        fx.world.in_combat.lock().unwrap().insert(PLAYER);
        let params = fx.params(TRAP).summoned_by(PLAYER, None);
        let mut trap = fx.spawn_with(params, &mut cx);

        tick(&mut trap, 100, &mut cx);
        assert_eq!(trap.loot_state(), LootState::Ready);
        assert_eq!(trap.cooldown_ms(), fx.clock.now_ms() + 2_000);

        *fx.world.trap_target.lock().unwrap() = Some(OTHER_PLAYER);
        tick(&mut trap, 100, &mut cx);
        assert_eq!(trap.loot_state(), LootState::Ready);

        fx.clock.advance_secs(2);
        tick(&mut trap, 100, &mut cx);
        assert_eq!(trap.loot_state(), LootState::Activated);
        assert_eq!(trap.loot_state_unit(), Some(OTHER_PLAYER));

        tick(&mut trap, 100, &mut cx);
        assert_eq!(casts(&cx), vec![(TRAP_SPELL, trap.guid(), Some(OTHER_PLAYER))]);
        assert_eq!(trap.loot_state(), LootState::Ready);
        assert_eq!(
            trap.cooldown_ms(),
            fx.clock.now_ms() + u64::from(WorldConfig::DEFAULT_TRAP_COOLDOWN_SECS) * 1000
        );
    }

    #[test]
    fn bomb_arms_then_detonates_once() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut bomb = fx.spawn(BOMB, &mut cx);

        tick(&mut bomb, 100, &mut cx);
        assert_eq!(bomb.loot_state(), LootState::Ready);
        fx.clock.advance_ms(WorldConfig::BOMB_ARM_DELAY_MS);
        tick(&mut bomb, 100, &mut cx);
        assert_eq!(bomb.loot_state(), LootState::Activated);
        tick(&mut bomb, 100, &mut cx);
        assert_eq!(bomb.loot_state(), LootState::JustDeactivated);
        assert_eq!(casts(&cx), vec![(TRAP_SPELL, bomb.guid(), None)]);
    }

    // ===== goobers and chests =====

    #[test]
    fn goober_rewards_each_unique_user_once() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let ai = RecordingAi::default();
        let params = fx.params(GOOBER);
        let mut goober = fx.spawn_scripted(params, Box::new(ai.clone()), &mut cx);
        goober.set_loot_state(LootState::Ready, None, &mut cx);

        let outcome = goober.use_object(Interactor::player(PLAYER), &mut cx).unwrap();
        assert_eq!(outcome, UseOutcome::Used);
        assert_eq!(goober.go_state(), GoState::Active);
        assert!(goober.flags().contains(GoFlags::IN_USE));
        assert!(ai.calls.lock().unwrap().contains(&"event:77".to_string()));
        let again = goober
            .use_object(Interactor::player(OTHER_PLAYER), &mut cx)
            .unwrap();
        assert_eq!(again, UseOutcome::NotUsable);

        fx.clock.advance_secs(1);
        tick(&mut goober, 100, &mut cx);
        assert_eq!(goober.loot_state(), LootState::JustDeactivated);
        assert!(!goober.flags().contains(GoFlags::IN_USE));

        tick(&mut goober, 100, &mut cx);
        assert_eq!(casts(&cx), vec![(GOOBER_SPELL, PLAYER, Some(PLAYER))]);
        assert_eq!(goober.unique_users().count(), 0);
        assert_eq!(goober.go_state(), GoState::Ready);
        assert_eq!(goober.loot_state(), LootState::NotReady);
    }

    #[test]
    fn nodespawn_goober_stays_deactivated() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut lever = fx.spawn(GOOBER_NODESPAWN, &mut cx);
        lever.set_loot_state(LootState::Ready, None, &mut cx);
        lever.use_object(Interactor::player(PLAYER), &mut cx).unwrap();
        assert!(cx.events().contains(&ObjectEvent::CustomAnimation { anim: 0 }));

        tick(&mut lever, 100, &mut cx);
        tick(&mut lever, 100, &mut cx);
        assert_eq!(lever.loot_state(), LootState::JustDeactivated);
        assert!(!lever.is_removed());
    }

    #[test]
    fn chest_loot_roll_ends_after_its_duration() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut chest = fx.spawn(CHEST, &mut cx);
        tick(&mut chest, 100, &mut cx);
        assert_eq!(
            chest.use_object(Interactor::player(PLAYER), &mut cx).unwrap(),
            UseOutcome::Used
        );
        chest.start_loot_roll(7, 1_000);

        tick(&mut chest, 600, &mut cx);
        assert!(!cx.events().contains(&ObjectEvent::LootRollEnded { group: 7 }));
        tick(&mut chest, 600, &mut cx);
        assert!(cx.events().contains(&ObjectEvent::LootRollEnded { group: 7 }));

        chest.release_loot(true, &mut cx);
        assert_eq!(chest.loot_state(), LootState::JustDeactivated);
    }

    #[test]
    fn spell_caster_deactivates_when_out_of_charges() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut portal = fx.spawn(SPELL_CASTER, &mut cx);
        tick(&mut portal, 100, &mut cx);
        portal.use_object(Interactor::player(PLAYER), &mut cx).unwrap();
        tick(&mut portal, 100, &mut cx);
        assert_eq!(portal.loot_state(), LootState::Ready);

        portal.use_object(Interactor::player(OTHER_PLAYER), &mut cx).unwrap();
        tick(&mut portal, 100, &mut cx);
        assert_eq!(portal.loot_state(), LootState::JustDeactivated);
        assert_eq!(portal.use_count(), 0);
    }

    // ===== transports and fishing =====

    #[test]
    fn transport_advances_and_refreshes_frames() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut transport = fx.spawn(TRANSPORT, &mut cx);
        tick(&mut transport, WorldConfig::TRANSPORT_STATE_UPDATE_MS, &mut cx);
        assert_eq!(transport.loot_state(), LootState::NotReady);
        assert!(cx.events().contains(&ObjectEvent::TransportFrameRefresh));
        let ObjectKind::Transport(state) = transport.kind() else {
            panic!("transport payload expected");
        };
        assert_eq!(
            state.path_progress_ms,
            u64::from(WorldConfig::TRANSPORT_STATE_UPDATE_MS)
        );
    }

    #[test]
    fn unattended_bobber_lets_the_fish_escape() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let params = fx.params(FISHING_NODE).summoned_by(PLAYER, None);
        let mut bobber = fx.spawn_with(params, &mut cx);
        bobber.set_respawn_time(20, &mut cx).unwrap();

        tick(&mut bobber, 100, &mut cx);
        assert_eq!(bobber.loot_state(), LootState::NotReady);

        fx.clock.advance_secs(16);
        tick(&mut bobber, 100, &mut cx);
        assert_eq!(bobber.loot_state(), LootState::Ready);
        assert_eq!(bobber.go_state(), GoState::Active);
        assert!(bobber.flags().contains(GoFlags::NODESPAWN));

        fx.clock.advance_secs(5);
        tick(&mut bobber, 100, &mut cx);
        assert!(cx.events().contains(&ObjectEvent::FishEscaped { owner: PLAYER }));
        assert_eq!(bobber.loot_state(), LootState::JustDeactivated);

        tick(&mut bobber, 100, &mut cx);
        assert!(bobber.is_removed());
    }

    // ===== destructible buildings =====

    #[test]
    fn building_health_is_clamped_and_drives_state() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let ai = RecordingAi::default();
        let params = fx.params(BUILDING);
        let mut tower = fx.spawn_scripted(params, Box::new(ai.clone()), &mut cx);
        assert!(tower.collision_enabled());

        tower.modify_health(-60, Some(PLAYER), &mut cx);
        assert_eq!(tower.building_health(), Some(40));
        assert!(tower.flags().contains(GoFlags::DAMAGED));

        tower.modify_health(-500, Some(PLAYER), &mut cx);
        assert_eq!(tower.building_health(), Some(0));
        assert!(tower.flags().contains(GoFlags::DESTROYED));
        assert!(!tower.collision_enabled());

        cx.take_events();
        tower.modify_health(-10, None, &mut cx);
        assert!(cx.events().is_empty());

        tower.modify_health(1_000, None, &mut cx);
        assert_eq!(tower.building_health(), Some(100));
        assert_eq!(tower.anim_progress(), 255);
        assert!(tower.flags().is_empty());
        assert!(tower.collision_enabled());

        let calls = ai.calls.lock().unwrap();
        assert!(calls.contains(&"damaged".to_string()));
        assert!(calls.contains(&"destroyed".to_string()));
    }

    #[test]
    fn rebuilding_restores_full_health() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut tower = fx.spawn(BUILDING, &mut cx);
        tower.modify_health(-100, None, &mut cx);
        tower.set_destructible_state(crate::object::DestructibleState::Rebuilding, None, true, &mut cx);
        assert_eq!(tower.building_health(), Some(100));
        assert!(cx.events().contains(&ObjectEvent::DestructibleStateChanged {
            state: crate::object::DestructibleState::Rebuilding
        }));
    }
}
