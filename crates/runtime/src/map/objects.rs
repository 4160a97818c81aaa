//! Game object instances of a map and the side effects they request.
use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::{debug, trace, warn};
use world_core::{
    CreateError, CreateParams, GameError, GameObjectInstance, Interactor, LifecycleError,
    NullObjectAi, ObjectContext, ObjectEvent, ObjectGuid, SpawnId, WorldEnv,
};

/// An object event that reached nearby clients.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectNotice {
    pub guid: ObjectGuid,
    pub event: ObjectEvent,
}

/// Counters of one object phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ObjectPhase {
    pub updated: usize,
    pub errors: usize,
    pub events: usize,
}

type Pending = VecDeque<(ObjectGuid, ObjectEvent)>;

/// Every instance resident on a map, keyed by guid.
#[derive(Default)]
pub(crate) struct ObjectSet {
    instances: BTreeMap<ObjectGuid, GameObjectInstance>,
    by_spawn: HashMap<SpawnId, ObjectGuid>,
    remove_list: Vec<ObjectGuid>,
    notices: Vec<ObjectNotice>,
}

impl ObjectSet {
    pub(crate) fn get(&self, guid: ObjectGuid) -> Option<&GameObjectInstance> {
        self.instances.get(&guid)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &GameObjectInstance> + '_ {
        self.instances.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn by_spawn(&self, spawn_id: SpawnId) -> Option<&GameObjectInstance> {
        self.by_spawn
            .get(&spawn_id)
            .and_then(|guid| self.instances.get(guid))
    }

    /// Whether a live, not yet deleted instance exists for `spawn_id`.
    pub(crate) fn has_live_spawn(&self, spawn_id: SpawnId) -> bool {
        self.by_spawn(spawn_id)
            .is_some_and(|instance| !instance.is_removed())
    }

    pub(crate) fn take_notices(&mut self) -> Vec<ObjectNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Creates an instance, adds it to the world and, when its template
    /// asks for one, spawns its linked trap.
    pub(crate) fn spawn(
        &mut self,
        params: CreateParams,
        trap_guid: impl FnOnce() -> ObjectGuid,
        env: &WorldEnv<'_>,
    ) -> Result<ObjectGuid, CreateError> {
        let guid = params.guid;
        let position = params.position;
        let spawn_id = params.spawn.spawn_id;
        let mut instance = GameObjectInstance::create(params, env, Box::new(NullObjectAi))?;

        let mut pending = Pending::new();
        let mut cx = ObjectContext::new(*env);
        instance.add_to_world(&mut cx);
        pending.extend(cx.take_events().into_iter().map(|event| (guid, event)));

        if let Some(trap_entry) = instance.template().linked_trap {
            let trap = trap_guid();
            let params = CreateParams::new(trap, trap_entry, position);
            match GameObjectInstance::create(params, env, Box::new(NullObjectAi)) {
                Ok(mut trap_instance) => {
                    let mut cx = ObjectContext::new(*env);
                    trap_instance.add_to_world(&mut cx);
                    pending.extend(cx.take_events().into_iter().map(|event| (trap, event)));
                    instance.set_linked_trap(trap);
                    self.instances.insert(trap, trap_instance);
                }
                Err(err) => warn!(
                    %guid,
                    trap_entry,
                    code = err.error_code(),
                    error = %err,
                    "linked trap could not be created"
                ),
            }
        }

        if !spawn_id.is_none() {
            self.by_spawn.insert(spawn_id, guid);
        }
        self.instances.insert(guid, instance);
        debug!(%guid, spawn = %spawn_id, "game object spawned");
        self.apply(pending, env);
        Ok(guid)
    }

    /// Runs one lifecycle tick on every instance, then applies the events.
    pub(crate) fn update_all(&mut self, diff: u32, env: &WorldEnv<'_>) -> ObjectPhase {
        let mut phase = ObjectPhase::default();
        let mut pending = Pending::new();
        for (guid, instance) in self.instances.iter_mut() {
            if instance.is_removed() {
                continue;
            }
            let mut cx = ObjectContext::new(*env);
            if let Err(err) = instance.update(diff, &mut cx) {
                phase.errors += 1;
                log_lifecycle_error(*guid, "update", &err);
            }
            phase.updated += 1;
            pending.extend(cx.take_events().into_iter().map(|event| (*guid, event)));
        }
        phase.events = self.apply(pending, env);
        phase
    }

    /// Runs `op` on one instance and applies what it emitted.
    pub(crate) fn with_instance<R>(
        &mut self,
        guid: ObjectGuid,
        env: &WorldEnv<'_>,
        op: impl FnOnce(&mut GameObjectInstance, &mut ObjectContext<'_>) -> Result<R, LifecycleError>,
    ) -> Option<Result<R, LifecycleError>> {
        let instance = self.instances.get_mut(&guid)?;
        let mut cx = ObjectContext::new(*env);
        let result = op(instance, &mut cx);
        let pending: Pending = cx
            .take_events()
            .into_iter()
            .map(|event| (guid, event))
            .collect();
        self.apply(pending, env);
        Some(result)
    }

    /// Applies queued events in order; follow-up events join the queue.
    fn apply(&mut self, mut pending: Pending, env: &WorldEnv<'_>) -> usize {
        let mut applied = 0;
        while let Some((guid, event)) = pending.pop_front() {
            applied += 1;
            match &event {
                ObjectEvent::AddedToMap => {
                    if let Some(instance) = self.instances.get_mut(&guid) {
                        let mut cx = ObjectContext::new(*env);
                        instance.add_to_world(&mut cx);
                        pending.extend(cx.take_events().into_iter().map(|event| (guid, event)));
                    }
                }
                ObjectEvent::DestroyForNearbyPlayers => {
                    if let Some(instance) = self.instances.get_mut(&guid) {
                        instance.remove_from_world();
                    }
                }
                ObjectEvent::RemoveFromWorld => {
                    if let Some(instance) = self.instances.get_mut(&guid) {
                        instance.remove_from_world();
                    }
                    if !self.remove_list.contains(&guid) {
                        self.remove_list.push(guid);
                    }
                }
                ObjectEvent::DespawnLinkedTrap { trap } => {
                    if let Some(instance) = self.instances.get_mut(trap) {
                        let mut cx = ObjectContext::new(*env);
                        if let Err(err) = instance.despawn_or_unsummon(0, 0, &mut cx) {
                            log_lifecycle_error(*trap, "despawn linked trap", &err);
                        }
                        pending.extend(cx.take_events().into_iter().map(|event| (*trap, event)));
                    }
                }
                ObjectEvent::TriggerLinkedTrap { trap, user } => {
                    let is_player = env
                        .world()
                        .map(|world| world.is_player(*user))
                        .unwrap_or(false);
                    let interactor = Interactor {
                        guid: *user,
                        is_player,
                    };
                    if let Some(instance) = self.instances.get_mut(trap) {
                        let mut cx = ObjectContext::new(*env);
                        match instance.use_object(interactor, &mut cx) {
                            Ok(outcome) => trace!(%trap, %user, %outcome, "linked trap triggered"),
                            Err(err) => log_lifecycle_error(*trap, "trigger linked trap", &err),
                        }
                        pending.extend(cx.take_events().into_iter().map(|event| (*trap, event)));
                    }
                }
                ObjectEvent::PoolUpdate { pool } => {
                    debug!(%guid, pool = pool.0, "pool refresh requested");
                }
                other => trace!(%guid, event = ?other, "object event"),
            }
            self.notices.push(ObjectNotice { guid, event });
        }
        applied
    }

    /// Drops every instance queued for removal.
    pub(crate) fn remove_pending(&mut self) -> usize {
        let mut removed = 0;
        for guid in std::mem::take(&mut self.remove_list) {
            let Some(instance) = self.instances.remove(&guid) else {
                continue;
            };
            let spawn_id = instance.spawn_id();
            if self.by_spawn.get(&spawn_id) == Some(&guid) {
                self.by_spawn.remove(&spawn_id);
            }
            trace!(%guid, spawn = %spawn_id, "game object removed from map");
            removed += 1;
        }
        removed
    }
}

pub(crate) fn log_lifecycle_error(guid: ObjectGuid, op: &'static str, err: &LifecycleError) {
    warn!(
        %guid,
        op,
        code = err.error_code(),
        severity = ?err.severity(),
        error = %err,
        "game object call failed"
    );
}
