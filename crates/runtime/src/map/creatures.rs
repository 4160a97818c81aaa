//! Creature slots, perception dispatch and movement.
use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, trace, warn};
use world_content::CreatureSpawn;
use world_core::{
    BoundaryId, CombatContext, Creature, CreatureAi, CreatureEvent, EvadeReason, MotionCommand,
    ObjectGuid, Position, ReactState, SpawnId, ThreatService, UnitKind, UnitView,
    VisualizeReport, ZoneCombatant,
};

use super::WorldMap;
use crate::error::{Result, RuntimeError};
use crate::threat::FactionId;

/// Distance at which creatures notice players.
pub const SIGHT_RANGE: f32 = 20.0;
/// Yards per second of a moving creature.
pub const RUN_SPEED: f32 = 7.0;
/// A chasing creature stops this close to its victim.
pub const MELEE_RANGE: f32 = 5.0;

/// A creature and the controller driving it.
#[derive(Debug)]
pub struct CreatureSlot {
    pub creature: Creature,
    pub ai: CreatureAi,
    /// `SpawnId::NONE` for summoned creatures.
    pub spawn_id: SpawnId,
}

pub(super) type CreatureMap = BTreeMap<ObjectGuid, CreatureSlot>;

impl WorldMap {
    pub fn creature(&self, guid: ObjectGuid) -> Option<&Creature> {
        self.creatures.get(&guid).map(|slot| &slot.creature)
    }

    pub fn creature_slot(&self, guid: ObjectGuid) -> Option<&CreatureSlot> {
        self.creatures.get(&guid)
    }

    pub fn creature_by_spawn(&self, spawn_id: SpawnId) -> Option<ObjectGuid> {
        self.creatures
            .iter()
            .find(|(_, slot)| slot.spawn_id == spawn_id)
            .map(|(guid, _)| *guid)
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    pub(super) fn spawn_creature(&mut self, spawn: &CreatureSpawn) -> ObjectGuid {
        let guid = Self::allocate_guid(&mut self.next_guid);
        let creature = Creature::new(guid, spawn.entry, spawn.position)
            .with_react_state(spawn.react_state)
            .civilian(spawn.civilian);
        self.threat.set_faction(guid, FactionId::MONSTERS);
        self.units.set_creature(creature.view(), false);
        self.creatures.insert(
            guid,
            CreatureSlot {
                creature,
                ai: CreatureAi::default().with_follow_distance(self.follow_distance),
                spawn_id: spawn.spawn_id,
            },
        );
        if let Some(boundary) = spawn.boundary
            && let Err(err) = self.set_creature_boundary(guid, Some((boundary, spawn.negate_boundary)))
        {
            warn!(creature = %guid, boundary = boundary.0, error = %err, "boundary not assigned");
        }
        trace!(creature = %guid, spawn = %spawn.spawn_id, entry = spawn.entry, "creature spawned");
        guid
    }

    /// Summons a defensive pet that follows `owner` and fights for it.
    pub fn summon_pet(&mut self, owner: ObjectGuid, entry: u32, position: Position) -> Result<ObjectGuid> {
        if self.units.view(owner).is_none() {
            return Err(RuntimeError::UnknownPlayer(owner));
        }
        let guid = Self::allocate_guid(&mut self.next_guid);
        let mut creature = Creature::new(guid, entry, position)
            .with_owner(owner)
            .with_react_state(ReactState::Defensive);
        creature.motion = MotionCommand::Follow {
            target: owner,
            distance: self.follow_distance,
            angle: creature.follow_angle,
        };
        if let Some(faction) = self.threat.faction(owner) {
            self.threat.set_faction(guid, faction);
        }
        self.units.set_creature(creature.view(), false);
        self.creatures.insert(
            guid,
            CreatureSlot {
                creature,
                ai: CreatureAi::default().with_follow_distance(self.follow_distance),
                spawn_id: SpawnId::NONE,
            },
        );
        debug!(pet = %guid, %owner, "pet summoned");
        Ok(guid)
    }

    /// Points a creature at a registered boundary, or clears it.
    ///
    /// An unknown boundary id leaves the creature unbounded.
    pub fn set_creature_boundary(
        &mut self,
        guid: ObjectGuid,
        boundary: Option<(BoundaryId, bool)>,
    ) -> Result<()> {
        let handle = boundary.and_then(|(id, negate)| {
            let handle = self.boundaries.handle(id, negate);
            if handle.is_none() {
                warn!(creature = %guid, boundary = id.0, "unknown boundary; creature left unbounded");
            }
            handle
        });
        let slot = self
            .creatures
            .get_mut(&guid)
            .ok_or(RuntimeError::UnknownCreature(guid))?;
        let mut cx = CombatContext::new(&mut self.threat);
        slot.ai.set_boundary(handle, &mut cx);
        let events = cx.take_events();
        self.apply_creature_events(guid, events);
        Ok(())
    }

    /// A player attacks a creature: the creature fights back unless it is
    /// evading home, and the player's pets join in.
    pub fn attack(&mut self, attacker: ObjectGuid, victim: ObjectGuid) -> Result<()> {
        if !self.creatures.contains_key(&victim) {
            return Err(RuntimeError::UnknownCreature(victim));
        }
        let player = self
            .units
            .player_mut(attacker)
            .ok_or(RuntimeError::UnknownPlayer(attacker))?;
        player.in_combat = true;

        if self.threat.can_begin_combat(victim, attacker)
            && let Some(slot) = self.creatures.get_mut(&victim)
            && slot.creature.alive
        {
            let mut cx = CombatContext::new(&mut self.threat);
            slot.ai.engage_with(&mut slot.creature, attacker, &mut cx);
            let events = cx.take_events();
            self.apply_creature_events(victim, events);
        }

        let target = self.units.view(victim);
        let pets: Vec<ObjectGuid> = self
            .creatures
            .iter()
            .filter(|(_, slot)| slot.creature.owner == Some(attacker))
            .map(|(guid, _)| *guid)
            .collect();
        for pet in pets {
            let Some(slot) = self.creatures.get_mut(&pet) else {
                continue;
            };
            let mut cx = CombatContext::new(&mut self.threat);
            slot.ai
                .on_owner_combat_interaction(&mut slot.creature, target.as_ref(), &mut cx);
            let events = cx.take_events();
            self.apply_creature_events(pet, events);
        }
        Ok(())
    }

    /// Pulls every living player of the map, with their pets and vehicles,
    /// into combat with creature `guid`. Returns how many players it engaged.
    pub fn zone_in_combat(&mut self, guid: ObjectGuid) -> Result<usize> {
        if !self.creatures.contains_key(&guid) {
            return Err(RuntimeError::UnknownCreature(guid));
        }
        let combatants: Vec<ZoneCombatant> = self
            .units
            .players()
            .filter_map(|(player, state)| {
                let view = self.units.view(player)?;
                let controlled = self
                    .creatures
                    .iter()
                    .filter(|(_, slot)| slot.creature.owner == Some(player) && slot.creature.alive)
                    .map(|(pet, _)| *pet)
                    .collect();
                Some(ZoneCombatant {
                    player: view,
                    controlled,
                    vehicle: state.vehicle,
                })
            })
            .collect();

        let Some(slot) = self.creatures.get_mut(&guid) else {
            return Err(RuntimeError::UnknownCreature(guid));
        };
        let mut cx = CombatContext::new(&mut self.threat);
        let engaged = slot.ai.do_zone_in_combat(&mut slot.creature, &combatants, &mut cx);
        let events = cx.take_events();
        self.apply_creature_events(guid, events);

        for combatant in &combatants {
            let target = combatant.player.guid;
            if self.threat.threat(guid, target).is_some()
                && let Some(player) = self.units.player_mut(target)
            {
                player.in_combat = true;
            }
        }
        debug!(creature = %guid, players = engaged, "zone pulled into combat");
        Ok(engaged)
    }

    /// Puts creature `guid` under `charmer`'s control, or lifts the charm
    /// with `None`. Lifting it makes the creature turn on its former
    /// charmer; returns whether it did.
    pub fn set_creature_charmer(&mut self, guid: ObjectGuid, charmer: Option<ObjectGuid>) -> Result<bool> {
        if let Some(charmer) = charmer
            && self.units.view(charmer).is_none()
        {
            return Err(RuntimeError::UnknownUnit(charmer));
        }
        let slot = self
            .creatures
            .get_mut(&guid)
            .ok_or(RuntimeError::UnknownCreature(guid))?;
        let previous = std::mem::replace(&mut slot.creature.charmer, charmer);
        if charmer.is_none() {
            slot.creature.last_charmer = previous;
        }
        let last_charmer = slot.creature.last_charmer.and_then(|unit| self.units.view(unit));

        let mut cx = CombatContext::new(&mut self.threat);
        let engaged = slot
            .ai
            .on_charmed(&mut slot.creature, previous != charmer, last_charmer.as_ref(), &mut cx);
        let events = cx.take_events();
        self.apply_creature_events(guid, events);
        debug!(creature = %guid, charmer = ?charmer, engaged, "charm changed");
        Ok(engaged)
    }

    /// Forces a creature out of combat. Returns whether it started evading.
    pub fn enter_evade_mode(&mut self, guid: ObjectGuid, why: EvadeReason) -> Result<bool> {
        let slot = self
            .creatures
            .get_mut(&guid)
            .ok_or(RuntimeError::UnknownCreature(guid))?;
        let mut cx = CombatContext::new(&mut self.threat);
        let evading = slot.ai.enter_evade_mode(&mut slot.creature, why, &mut cx);
        let events = cx.take_events();
        self.apply_creature_events(guid, events);
        Ok(evading)
    }

    /// Flood-fills a creature's boundary into the map's marker list.
    ///
    /// The requester's position, when given, is tried first as the seed.
    pub fn visualize_boundary(
        &mut self,
        guid: ObjectGuid,
        requester: Option<ObjectGuid>,
        duration_secs: u32,
        fill_interior: bool,
    ) -> Result<VisualizeReport> {
        let seed = requester
            .and_then(|unit| self.units.view(unit))
            .map(|view| view.position);
        let slot = self
            .creatures
            .get(&guid)
            .ok_or(RuntimeError::UnknownCreature(guid))?;
        Ok(slot.ai.visualize_boundary(
            &slot.creature,
            seed.as_ref(),
            duration_secs,
            fill_interior,
            &mut self.markers,
        ))
    }

    pub(super) fn update_creatures(&mut self, diff: u32) -> usize {
        let guids: Vec<ObjectGuid> = self.creatures.keys().copied().collect();
        for guid in &guids {
            let Some(slot) = self.creatures.get_mut(guid) else {
                continue;
            };
            let mut cx = CombatContext::new(&mut self.threat);
            slot.ai.update_ai(&mut slot.creature, diff, &mut cx);
            let events = cx.take_events();
            self.apply_creature_events(*guid, events);
            self.advance_motion(*guid, diff);
        }
        guids.len()
    }

    /// Runs one perception dispatch of `who` for creature `guid`.
    ///
    /// Returns false when the dispatch was dropped because one is already
    /// running for that creature.
    pub(super) fn perceive(&mut self, guid: ObjectGuid, who: &UnitView) -> bool {
        let Some(slot) = self.creatures.get_mut(&guid) else {
            return false;
        };
        if !slot.ai.enter_perception() {
            trace!(creature = %guid, who = %who.guid, "nested perception dropped");
            return false;
        }
        let stealthed = who.kind == UnitKind::Player
            && self
                .units
                .player(who.guid)
                .is_some_and(|player| player.stealthed);
        let mut cx = CombatContext::new(&mut self.threat);
        if stealthed {
            slot.ai.trigger_alert(&mut slot.creature, who, &mut cx);
        } else {
            slot.ai.move_in_line_of_sight(&mut slot.creature, who, &mut cx);
        }
        let events = cx.take_events();
        self.apply_creature_events(guid, events);

        if let Some(slot) = self.creatures.get_mut(&guid) {
            slot.ai.exit_perception();
        }
        true
    }

    /// Lets every creature within sight of `player` perceive it.
    pub(super) fn notify_player_moved(&mut self, player: ObjectGuid) {
        let Some(view) = self.units.view(player) else {
            return;
        };
        let nearby: Vec<ObjectGuid> = self
            .creatures
            .iter()
            .filter(|(_, slot)| {
                slot.creature.alive && slot.creature.position.distance_2d(&view.position) <= SIGHT_RANGE
            })
            .map(|(guid, _)| *guid)
            .collect();
        for guid in nearby {
            self.perceive(guid, &view);
        }
    }

    /// A creature moved: it perceives every player now in sight.
    fn notify_relocation(&mut self, guid: ObjectGuid) {
        let Some(position) = self.creatures.get(&guid).map(|slot| slot.creature.position) else {
            return;
        };
        for view in self.units.players_near(&position, SIGHT_RANGE) {
            self.perceive(guid, &view);
        }
    }

    pub(super) fn retarget_or_evade(&mut self, guid: ObjectGuid) {
        let Some(slot) = self.creatures.get_mut(&guid) else {
            return;
        };
        let mut cx = CombatContext::new(&mut self.threat);
        if cx.threat().select_victim(guid).is_some() {
            slot.ai.update_victim(&mut slot.creature, &mut cx);
        } else {
            slot.ai
                .enter_evade_mode(&mut slot.creature, EvadeReason::NoHostiles, &mut cx);
        }
        let events = cx.take_events();
        self.apply_creature_events(guid, events);
    }

    fn apply_creature_events(&mut self, guid: ObjectGuid, events: Vec<CreatureEvent>) {
        let mut queue: VecDeque<CreatureEvent> = events.into();
        while let Some(event) = queue.pop_front() {
            match event {
                CreatureEvent::MotionChanged(motion) => {
                    trace!(creature = %guid, ?motion, "motion changed");
                    self.sync_unit(guid);
                    self.notify_relocation(guid);
                }
                CreatureEvent::BoundaryCheckRequested => {
                    if let Some(slot) = self.creatures.get_mut(&guid) {
                        let mut cx = CombatContext::new(&mut self.threat);
                        slot.ai.check_in_room(&mut slot.creature, &mut cx);
                        queue.extend(cx.take_events());
                    }
                }
                CreatureEvent::AttackStarted { target } => {
                    debug!(creature = %guid, %target, "attack started");
                }
                CreatureEvent::AttackStopped => debug!(creature = %guid, "attack stopped"),
                CreatureEvent::AiReaction(reaction) => {
                    debug!(creature = %guid, ?reaction, "ai reaction");
                }
                CreatureEvent::EvadeEntered(reason) => {
                    debug!(creature = %guid, %reason, "creature evading");
                }
            }
        }
        self.sync_unit(guid);
    }

    fn sync_unit(&mut self, guid: ObjectGuid) {
        if let Some(slot) = self.creatures.get(&guid) {
            self.units
                .set_creature(slot.creature.view(), slot.creature.in_combat);
        }
    }

    /// Moves a creature along its current motion for `diff` milliseconds.
    fn advance_motion(&mut self, guid: ObjectGuid, diff: u32) {
        let Some(slot) = self.creatures.get(&guid) else {
            return;
        };
        if !slot.creature.alive {
            return;
        }
        let motion = slot.creature.motion;
        let (goal, stop_at) = match motion {
            MotionCommand::Chase { target } => match self.units.view(target) {
                Some(view) => (view.position, MELEE_RANGE),
                None => return,
            },
            MotionCommand::Follow {
                target, distance, ..
            } => match self.units.view(target) {
                Some(view) => (view.position, distance),
                None => return,
            },
            MotionCommand::TargetedHome { home } => (home, 0.0),
            MotionCommand::Idle | MotionCommand::Distract { .. } => return,
        };
        let from = slot.creature.position;
        let step = RUN_SPEED * diff as f32 / 1000.0;
        let (next, arrived) = step_towards(&from, &goal, step, stop_at);

        if let Some(slot) = self.creatures.get_mut(&guid) {
            slot.creature.position = next;
            if arrived && matches!(motion, MotionCommand::TargetedHome { .. }) {
                slot.ai.just_reached_home(&mut slot.creature);
                debug!(creature = %guid, "creature reached home");
            }
        }
        self.sync_unit(guid);
        if next != from {
            self.notify_relocation(guid);
        }
    }
}

/// Next position on the straight line from `from` to `to`, stopping
/// `stop_at` short of it. The flag tells whether the stop was reached.
fn step_towards(from: &Position, to: &Position, step: f32, stop_at: f32) -> (Position, bool) {
    let distance = from.distance_2d(to);
    if distance <= stop_at {
        return (*from, true);
    }
    let remaining = distance - stop_at;
    if step >= remaining && stop_at == 0.0 {
        return (*to, true);
    }
    let travel = remaining.min(step);
    let ratio = travel / distance;
    let next = Position::new(
        from.x + (to.x - from.x) * ratio,
        from.y + (to.y - from.y) * ratio,
        from.z + (to.z - from.z) * ratio,
    )
    .with_orientation(from.angle_to(to));
    (next, travel >= remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stops_short_of_target() {
        let from = Position::new(0.0, 0.0, 0.0);
        let to = Position::new(10.0, 0.0, 0.0);

        let (next, arrived) = step_towards(&from, &to, 2.0, MELEE_RANGE);
        assert!((next.x - 2.0).abs() < 1e-4);
        assert!(!arrived);

        let (next, arrived) = step_towards(&from, &to, 50.0, MELEE_RANGE);
        assert!((next.x - 5.0).abs() < 1e-4);
        assert!(arrived);
    }

    #[test]
    fn step_home_lands_exactly() {
        let from = Position::new(3.0, 4.0, 0.0);
        let home = Position::new(0.0, 0.0, 1.0);
        assert_eq!(step_towards(&from, &home, 10.0, 0.0), (home, true));
        assert_eq!(step_towards(&home, &home, 10.0, 0.0), (home, true));
    }
}
