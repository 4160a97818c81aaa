use crate::config::WorldConfig;
use crate::state::ObjectGuid;

use super::threat::CombatContext;
use super::unit::{Creature, MotionCommand, ReactState, UnitKind, UnitState, UnitView};
use super::{AiReaction, CreatureAi, CreatureEvent};

/// A player pulled into a zone-wide fight.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneCombatant {
    pub player: UnitView,
    /// Pets and guardians the player controls.
    pub controlled: Vec<ObjectGuid>,
    pub vehicle: Option<ObjectGuid>,
}

impl CreatureAi {
    /// Reacts to `who` coming into view. No-op while engaged.
    pub fn move_in_line_of_sight(&mut self, me: &mut Creature, who: &UnitView, cx: &mut CombatContext<'_>) {
        if me.engaged {
            return;
        }
        if me.react_state == ReactState::Aggressive && Self::can_start_attack(me, who, cx) {
            self.engage_with(me, who.guid, cx);
        }
    }

    /// [`Self::move_in_line_of_sight`] behind the perception guard.
    ///
    /// Returns false when the call was dropped as a nested re-entry.
    pub fn move_in_line_of_sight_safe(
        &mut self,
        me: &mut Creature,
        who: &UnitView,
        cx: &mut CombatContext<'_>,
    ) -> bool {
        if !self.perception.try_enter() {
            return false;
        }
        self.move_in_line_of_sight(me, who, cx);
        self.perception.exit();
        true
    }

    /// Engages a target the controlling owner fought with, unless passive.
    pub fn on_owner_combat_interaction(
        &mut self,
        me: &mut Creature,
        target: Option<&UnitView>,
        cx: &mut CombatContext<'_>,
    ) {
        let Some(target) = target else {
            return;
        };
        if !me.alive {
            return;
        }
        if me.react_state != ReactState::Passive && Self::can_start_attack(me, target, cx) {
            self.engage_with(me, target.guid, cx);
        }
    }

    /// Makes an idle creature notice a sneaking hostile player.
    ///
    /// The creature does not attack; it plays an alert reaction and faces
    /// `who` while distracted for a fixed duration.
    pub fn trigger_alert(&self, me: &mut Creature, who: &UnitView, cx: &mut CombatContext<'_>) {
        if who.kind != UnitKind::Player {
            return;
        }
        let blocking = UnitState::CONFUSED | UnitState::STUNNED | UnitState::FLEEING | UnitState::DISTRACTED;
        if me.engaged || me.unit_state.intersects(blocking) {
            return;
        }
        if me.civilian
            || me.react_state == ReactState::Passive
            || !who.alive
            || !cx.threat().is_hostile(me.guid, who.guid)
        {
            return;
        }
        cx.emit(CreatureEvent::AiReaction(AiReaction::Alert));
        me.unit_state.insert(UnitState::DISTRACTED);
        me.motion = MotionCommand::Distract {
            remaining_ms: WorldConfig::ALERT_DURATION_MS,
            angle: me.position.angle_to(&who.position),
        };
        cx.emit(CreatureEvent::MotionChanged(me.motion));
    }

    /// Engages every living player `me` may fight, together with the
    /// units each one controls and the vehicle it rides.
    ///
    /// Returns how many players were engaged.
    pub fn do_zone_in_combat(
        &mut self,
        me: &mut Creature,
        combatants: &[ZoneCombatant],
        cx: &mut CombatContext<'_>,
    ) -> usize {
        let mut engaged = 0;
        for combatant in combatants {
            let player = &combatant.player;
            if !player.alive || !cx.threat().can_begin_combat(me.guid, player.guid) {
                continue;
            }
            if !self.engage_with(me, player.guid, cx) {
                break;
            }
            engaged += 1;
            for unit in combatant.controlled.iter().copied().chain(combatant.vehicle) {
                self.engage_with(me, unit, cx);
            }
        }
        engaged
    }

    /// Charm applied to or lifted from `me`.
    ///
    /// Once a new charm state leaves `me` uncharmed, it turns on its last
    /// charmer unless passive. `last_charmer` is that unit as the map still
    /// sees it; `None` when it is gone. Returns whether `me` engaged.
    pub fn on_charmed(
        &mut self,
        me: &mut Creature,
        is_new: bool,
        last_charmer: Option<&UnitView>,
        cx: &mut CombatContext<'_>,
    ) -> bool {
        if !is_new || me.charmer.is_some() {
            return false;
        }
        let Some(previous) = me.last_charmer.take() else {
            return false;
        };
        if me.react_state == ReactState::Passive {
            return false;
        }
        match last_charmer {
            Some(view) if view.guid == previous => self.engage_with(me, previous, cx),
            _ => false,
        }
    }

    /// Enters combat with `target` and notifies the threat subsystem.
    ///
    /// Refused while `me` is dead or evading. Returns whether `me` is
    /// engaged afterwards.
    pub fn engage_with(&mut self, me: &mut Creature, target: ObjectGuid, cx: &mut CombatContext<'_>) -> bool {
        if !me.alive || me.is_evading() {
            return false;
        }
        let first = !me.engaged;
        cx.threat().add_threat(me.guid, target, 0.0);
        me.engaged = true;
        me.in_combat = true;
        if first {
            tracing::debug!(creature = %me.guid, %target, "creature engaged");
            self.script.just_engaged_with(target);
        }
        if me.victim.is_none() {
            Self::attack_start(me, target, cx);
        }
        true
    }

    pub(crate) fn attack_start(me: &mut Creature, target: ObjectGuid, cx: &mut CombatContext<'_>) {
        if me.victim == Some(target) {
            return;
        }
        me.victim = Some(target);
        cx.emit(CreatureEvent::AttackStarted { target });
        me.motion = MotionCommand::Chase { target };
        cx.emit(CreatureEvent::MotionChanged(me.motion));
    }

    pub(crate) fn attack_stop(me: &mut Creature, cx: &mut CombatContext<'_>) {
        if me.victim.take().is_some() {
            cx.emit(CreatureEvent::AttackStopped);
        }
    }

    fn can_start_attack(me: &Creature, who: &UnitView, cx: &mut CombatContext<'_>) -> bool {
        who.alive
            && who.attackable
            && who.guid != me.guid
            && !me.is_evading()
            && cx.threat().can_begin_combat(me.guid, who.guid)
    }
}
