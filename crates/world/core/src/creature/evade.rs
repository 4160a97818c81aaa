use crate::boundary::{BoundaryHandle, MarkerSink, VisualizeReport, VisualizeStatus, flood_fill};
use crate::state::{Position, Timestamp};

use super::threat::CombatContext;
use super::unit::{Creature, MotionCommand, ReactState, UnitState};
use super::{CreatureAi, CreatureEvent, EvadeReason};

impl CreatureAi {
    /// Disengages `me` and sends it home or back to its owner.
    ///
    /// Returns false without side effects when `me` is dead or already
    /// evading.
    pub fn enter_evade_mode(&mut self, me: &mut Creature, why: EvadeReason, cx: &mut CombatContext<'_>) -> bool {
        if !me.alive || me.is_evading() {
            return false;
        }
        tracing::debug!(creature = %me.guid, entry = me.entry, reason = %why, "creature enters evade mode");

        cx.threat().clear_all_threat(me.guid);
        Self::attack_stop(me, cx);
        me.engaged = false;
        me.in_combat = false;
        me.loot_recipient = None;
        me.player_damage_required = false;
        me.last_damaged = Timestamp::ZERO;
        me.cannot_reach_target = false;

        // Vehicle passengers are positioned by their vehicle.
        if me.vehicle.is_none() {
            me.motion = match me.owner {
                Some(owner) => MotionCommand::Follow {
                    target: owner,
                    distance: self.follow_distance,
                    angle: me.follow_angle,
                },
                None => {
                    me.unit_state.insert(UnitState::EVADE);
                    MotionCommand::TargetedHome { home: me.home }
                }
            };
            cx.emit(CreatureEvent::MotionChanged(me.motion));
        }
        cx.emit(CreatureEvent::EvadeEntered(why));
        self.script.reset();
        true
    }

    /// Re-targets the best victim. Returns whether `me` still fights.
    pub fn update_victim(&mut self, me: &mut Creature, cx: &mut CombatContext<'_>) -> bool {
        if !me.engaged {
            return false;
        }
        if me.react_state != ReactState::Passive {
            if let Some(victim) = cx.threat().select_victim(me.guid)
                && me.focus_target.is_none()
                && me.victim != Some(victim)
            {
                Self::attack_start(me, victim, cx);
            }
            return me.victim.is_some();
        }
        if !me.in_combat {
            self.enter_evade_mode(me, EvadeReason::NoHostiles, cx);
            return false;
        }
        Self::attack_stop(me, cx);
        true
    }

    /// Containment test against the current boundary handle.
    ///
    /// `None` tests `me`'s own position. No boundary means everywhere is
    /// inside.
    pub fn is_in_boundary(&self, me: &Creature, position: Option<&Position>) -> bool {
        match &self.boundary {
            Some(handle) => handle.contains(position.unwrap_or(&me.position)),
            None => true,
        }
    }

    /// Swaps the boundary handle and requests an immediate check.
    pub fn set_boundary(&mut self, boundary: Option<BoundaryHandle>, cx: &mut CombatContext<'_>) {
        self.boundary = boundary;
        cx.emit(CreatureEvent::BoundaryCheckRequested);
    }

    /// Evades with [`EvadeReason::Boundary`] when `me` left its boundary.
    pub fn check_in_room(&mut self, me: &mut Creature, cx: &mut CombatContext<'_>) -> bool {
        if self.is_in_boundary(me, None) {
            return true;
        }
        self.enter_evade_mode(me, EvadeReason::Boundary, cx);
        false
    }

    /// Home reached after evading: re-aggro is allowed again.
    ///
    /// `me` settles exactly on its home position, facing home orientation.
    pub fn just_reached_home(&mut self, me: &mut Creature) {
        me.position = me.home;
        me.unit_state.remove(UnitState::EVADE);
        me.motion = MotionCommand::Idle;
        self.script.just_reached_home();
    }

    /// Per-tick creature AI: distraction countdown, victim tick, room check.
    pub fn update_ai(&mut self, me: &mut Creature, diff: u32, cx: &mut CombatContext<'_>) {
        if !me.alive {
            return;
        }
        if let MotionCommand::Distract { remaining_ms, angle } = me.motion {
            if remaining_ms > diff {
                me.motion = MotionCommand::Distract {
                    remaining_ms: remaining_ms - diff,
                    angle,
                };
            } else {
                me.unit_state.remove(UnitState::DISTRACTED);
                me.motion = MotionCommand::Idle;
                cx.emit(CreatureEvent::MotionChanged(me.motion));
            }
        }
        if !self.update_victim(me, cx) {
            return;
        }
        self.check_in_room(me, cx);
    }

    /// Flood-fills the current boundary for visual debugging.
    ///
    /// The seed is the first inside position of `requester`, `me`'s
    /// position and `me`'s home.
    pub fn visualize_boundary(
        &self,
        me: &Creature,
        requester: Option<&Position>,
        duration_secs: u32,
        fill_interior: bool,
        sink: &mut dyn MarkerSink,
    ) -> VisualizeReport {
        let Some(handle) = &self.boundary else {
            return VisualizeReport::failed(VisualizeStatus::NotBounded);
        };
        let Some(boundary) = handle.get().filter(|boundary| !boundary.is_empty()) else {
            return VisualizeReport::failed(VisualizeStatus::NotBounded);
        };
        let negate = handle.is_negated();
        let contains = |position: &Position| boundary.contains(position) != negate;

        let seed = requester
            .into_iter()
            .chain([&me.position, &me.home])
            .find(|candidate| contains(*candidate))
            .copied();
        let Some(seed) = seed else {
            return VisualizeReport::failed(VisualizeStatus::NoInteriorPointFound);
        };
        let report = flood_fill(seed, contains, duration_secs, fill_interior, sink);
        tracing::trace!(
            creature = %me.guid,
            status = ?report.status,
            visited = report.visited_cells,
            markers = report.markers,
            "boundary visualized"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::*;
    use super::*;
    use crate::boundary::{AreaBoundary, Boundary, Marker, Shape};

    fn square(half: f32) -> Arc<Boundary> {
        Arc::new(Boundary::new(vec![AreaBoundary::new(Shape::Rectangle {
            min_x: -half,
            max_x: half,
            min_y: -half,
            max_y: half,
        })]))
    }

    fn engaged(me: &mut Creature) {
        me.engaged = true;
        me.in_combat = true;
        me.victim = Some(PLAYER);
    }

    // ===== evade =====

    #[test]
    fn evade_resets_combat_and_goes_home() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let script = RecordingScript::default();
        let mut ai = CreatureAi::new(Box::new(script.clone()));
        let mut me = creature();
        engaged(&mut me);
        me.loot_recipient = Some(PLAYER);
        me.position = Position::new(30.0, 0.0, 0.0);

        assert!(ai.enter_evade_mode(&mut me, EvadeReason::Other, &mut cx));
        assert!(!me.engaged && !me.in_combat);
        assert_eq!(me.victim, None);
        assert_eq!(me.loot_recipient, None);
        assert!(me.is_evading());
        assert_eq!(me.motion, MotionCommand::TargetedHome { home: me.home });
        assert!(cx.events().contains(&CreatureEvent::EvadeEntered(EvadeReason::Other)));
        drop(cx);
        assert_eq!(threat.clears.get(&ME), Some(&1));
        assert_eq!(*script.calls.lock().unwrap(), vec!["reset".to_string()]);
    }

    #[test]
    fn evade_is_idempotent() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let script = RecordingScript::default();
        let mut ai = CreatureAi::new(Box::new(script.clone()));
        let mut me = creature();
        engaged(&mut me);

        assert!(ai.enter_evade_mode(&mut me, EvadeReason::NoHostiles, &mut cx));
        cx.take_events();
        assert!(!ai.enter_evade_mode(&mut me, EvadeReason::NoHostiles, &mut cx));
        assert!(cx.events().is_empty());
        drop(cx);
        assert_eq!(threat.clears.get(&ME), Some(&1));
        assert_eq!(script.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn dead_creature_does_not_evade() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature();
        me.alive = false;
        assert!(!ai.enter_evade_mode(&mut me, EvadeReason::Other, &mut cx));
        assert!(cx.events().is_empty());
    }

    #[test]
    fn pet_evades_back_to_owner() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default().with_follow_distance(2.0);
        let mut me = creature().with_owner(OWNER);
        engaged(&mut me);

        assert!(ai.enter_evade_mode(&mut me, EvadeReason::Other, &mut cx));
        assert!(!me.is_evading());
        assert_eq!(
            me.motion,
            MotionCommand::Follow {
                target: OWNER,
                distance: 2.0,
                angle: me.follow_angle,
            }
        );
    }

    #[test]
    fn vehicle_passenger_keeps_its_motion() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature().in_vehicle(OTHER);
        engaged(&mut me);
        me.motion = MotionCommand::Idle;

        assert!(ai.enter_evade_mode(&mut me, EvadeReason::Other, &mut cx));
        assert_eq!(me.motion, MotionCommand::Idle);
        assert!(!cx
            .events()
            .iter()
            .any(|event| matches!(event, CreatureEvent::MotionChanged(_))));
    }

    #[test]
    fn reaching_home_clears_evade() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let script = RecordingScript::default();
        let mut ai = CreatureAi::new(Box::new(script.clone()));
        let mut me = creature();
        engaged(&mut me);
        ai.enter_evade_mode(&mut me, EvadeReason::Other, &mut cx);

        ai.just_reached_home(&mut me);
        assert!(!me.is_evading());
        assert_eq!(me.motion, MotionCommand::Idle);
        assert_eq!(script.calls.lock().unwrap().last(), Some(&"home".to_string()));
    }

    #[test]
    fn reaching_home_settles_on_home_position() {
        let mut ai = CreatureAi::default();
        let mut me = creature();
        me.unit_state.insert(UnitState::EVADE);
        // Last movement step ended on the home coordinates, still facing
        // the chase direction.
        me.position = me.home.with_orientation(3.05);

        ai.just_reached_home(&mut me);
        assert_eq!(me.position, me.home);
        assert!(!me.is_evading());
    }

    // ===== victim selection =====

    #[test]
    fn update_victim_switches_to_top_threat() {
        let mut threat = StubThreat::default();
        threat.victim = Some(OTHER);
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature();
        engaged(&mut me);

        assert!(ai.update_victim(&mut me, &mut cx));
        assert_eq!(me.victim, Some(OTHER));

        me.focus_target = Some(PLAYER);
        me.victim = Some(PLAYER);
        assert!(ai.update_victim(&mut me, &mut cx));
        assert_eq!(me.victim, Some(PLAYER));
    }

    #[test]
    fn passive_in_combat_stops_attacking_without_evading() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature().with_react_state(ReactState::Passive);
        engaged(&mut me);

        assert!(ai.update_victim(&mut me, &mut cx));
        assert_eq!(me.victim, None);
        assert!(me.in_combat);
        assert!(!me.is_evading());
        assert_eq!(cx.events(), &[CreatureEvent::AttackStopped]);
    }

    #[test]
    fn passive_out_of_combat_evades() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature().with_react_state(ReactState::Passive);
        engaged(&mut me);
        me.in_combat = false;

        assert!(!ai.update_victim(&mut me, &mut cx));
        assert!(cx
            .events()
            .contains(&CreatureEvent::EvadeEntered(EvadeReason::NoHostiles)));
    }

    // ===== boundary =====

    #[test]
    fn leaving_the_room_triggers_boundary_evade() {
        let boundary = square(10.0);
        let mut threat = StubThreat::default();
        threat.victim = Some(PLAYER);
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        ai.set_boundary(Some(BoundaryHandle::new(&boundary, false)), &mut cx);
        assert_eq!(cx.events(), &[CreatureEvent::BoundaryCheckRequested]);
        let mut me = creature();
        engaged(&mut me);

        ai.update_ai(&mut me, 100, &mut cx);
        assert!(me.engaged);

        me.position = Position::new(25.0, 0.0, 0.0);
        ai.update_ai(&mut me, 100, &mut cx);
        assert!(!me.engaged);
        assert!(cx
            .events()
            .contains(&CreatureEvent::EvadeEntered(EvadeReason::Boundary)));
    }

    #[test]
    fn negated_and_released_boundaries() {
        let boundary = square(10.0);
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let me = creature();
        let outside = Position::new(50.0, 0.0, 0.0);

        assert!(ai.is_in_boundary(&me, Some(&outside)));

        ai.set_boundary(Some(BoundaryHandle::new(&boundary, true)), &mut cx);
        assert!(ai.is_in_boundary(&me, Some(&outside)));
        assert!(!ai.is_in_boundary(&me, None));

        drop(boundary);
        assert!(ai.is_in_boundary(&me, None));
    }

    #[test]
    fn distraction_wears_off() {
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        let mut me = creature();
        me.unit_state.insert(UnitState::DISTRACTED);
        me.motion = MotionCommand::Distract {
            remaining_ms: 1_000,
            angle: 0.0,
        };

        ai.update_ai(&mut me, 600, &mut cx);
        assert!(me.unit_state.contains(UnitState::DISTRACTED));
        ai.update_ai(&mut me, 600, &mut cx);
        assert!(!me.unit_state.contains(UnitState::DISTRACTED));
        assert_eq!(me.motion, MotionCommand::Idle);
    }

    // ===== visualization =====

    #[test]
    fn visualize_without_boundary_is_not_bounded() {
        let ai = CreatureAi::default();
        let mut markers: Vec<Marker> = Vec::new();
        let report = ai.visualize_boundary(&creature(), None, 10, false, &mut markers);
        assert_eq!(report.status, VisualizeStatus::NotBounded);
        assert!(markers.is_empty());
    }

    #[test]
    fn visualize_seeds_from_requester_first() {
        let boundary = square(3.0);
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        ai.set_boundary(Some(BoundaryHandle::new(&boundary, false)), &mut cx);
        let mut me = creature();
        me.position = Position::new(100.0, 0.0, 0.0);
        let requester = Position::new(2.0, 1.0, 0.0);

        let mut markers: Vec<Marker> = Vec::new();
        let report = ai.visualize_boundary(&me, Some(&requester), 10, false, &mut markers);
        assert_eq!(report.status, VisualizeStatus::Success);
        assert_eq!(report.seed, Some(requester));
        assert!(!markers.is_empty());
    }

    #[test]
    fn visualize_falls_back_to_home_then_fails() {
        let boundary = square(3.0);
        let mut threat = StubThreat::default();
        let mut cx = CombatContext::new(&mut threat);
        let mut ai = CreatureAi::default();
        ai.set_boundary(Some(BoundaryHandle::new(&boundary, false)), &mut cx);
        let mut me = creature();
        me.position = Position::new(100.0, 0.0, 0.0);
        let requester = Position::new(-100.0, 0.0, 0.0);

        let mut markers: Vec<Marker> = Vec::new();
        let report = ai.visualize_boundary(&me, Some(&requester), 10, false, &mut markers);
        assert_eq!(report.seed, Some(me.home));

        me.home = Position::new(0.0, 200.0, 0.0);
        let report = ai.visualize_boundary(&me, Some(&requester), 10, false, &mut markers);
        assert_eq!(report.status, VisualizeStatus::NoInteriorPointFound);
    }
}
