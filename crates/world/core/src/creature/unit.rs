use bitflags::bitflags;

use crate::state::{ObjectGuid, Position, Timestamp};

/// Reactive aggression policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactState {
    Passive,
    Defensive,
    #[default]
    Aggressive,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct UnitState: u32 {
        /// Retreating home; suppresses re-aggro.
        const EVADE = 0x0001;
        const CONFUSED = 0x0002;
        const STUNNED = 0x0004;
        const FLEEING = 0x0008;
        const DISTRACTED = 0x0010;
    }
}

/// Current movement order of a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MotionCommand {
    #[default]
    Idle,
    Chase { target: ObjectGuid },
    Follow {
        target: ObjectGuid,
        distance: f32,
        angle: f32,
    },
    TargetedHome { home: Position },
    /// Face `angle` and stand still for `remaining_ms`.
    Distract { remaining_ms: u32, angle: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Player,
    Creature,
}

/// What a creature knows about another unit it perceives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitView {
    pub guid: ObjectGuid,
    pub kind: UnitKind,
    pub position: Position,
    pub alive: bool,
    /// Reachable and not immune.
    pub attackable: bool,
}

/// A mobile actor driven by a [`super::CreatureAi`].
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    pub guid: ObjectGuid,
    pub entry: u32,
    pub position: Position,
    pub home: Position,
    pub alive: bool,
    pub react_state: ReactState,
    pub unit_state: UnitState,
    /// Holds a threat list.
    pub engaged: bool,
    pub in_combat: bool,
    pub victim: Option<ObjectGuid>,
    /// Controlling owner (pets, guardians).
    pub owner: Option<ObjectGuid>,
    pub vehicle: Option<ObjectGuid>,
    /// Unit currently controlling `self` through a charm.
    pub charmer: Option<ObjectGuid>,
    /// Charmer of the charm that ended last, until it is reacted to.
    pub last_charmer: Option<ObjectGuid>,
    /// Scripted focus target that pins victim selection.
    pub focus_target: Option<ObjectGuid>,
    pub loot_recipient: Option<ObjectGuid>,
    pub civilian: bool,
    pub cannot_reach_target: bool,
    pub player_damage_required: bool,
    pub last_damaged: Timestamp,
    pub follow_angle: f32,
    pub motion: MotionCommand,
}

impl Creature {
    pub fn new(guid: ObjectGuid, entry: u32, home: Position) -> Self {
        Self {
            guid,
            entry,
            position: home,
            home,
            alive: true,
            react_state: ReactState::Aggressive,
            unit_state: UnitState::empty(),
            engaged: false,
            in_combat: false,
            victim: None,
            owner: None,
            vehicle: None,
            charmer: None,
            last_charmer: None,
            focus_target: None,
            loot_recipient: None,
            civilian: false,
            cannot_reach_target: false,
            player_damage_required: false,
            last_damaged: Timestamp::ZERO,
            follow_angle: core::f32::consts::FRAC_PI_2,
            motion: MotionCommand::Idle,
        }
    }

    pub fn with_react_state(mut self, state: ReactState) -> Self {
        self.react_state = state;
        self
    }

    pub fn with_owner(mut self, owner: ObjectGuid) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn in_vehicle(mut self, vehicle: ObjectGuid) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn civilian(mut self, civilian: bool) -> Self {
        self.civilian = civilian;
        self
    }

    pub fn is_charmed(&self) -> bool {
        self.charmer.is_some()
    }

    pub fn is_evading(&self) -> bool {
        self.unit_state.contains(UnitState::EVADE)
    }

    pub fn view(&self) -> UnitView {
        UnitView {
            guid: self.guid,
            kind: UnitKind::Creature,
            position: self.position,
            alive: self.alive,
            attackable: self.alive && !self.is_evading(),
        }
    }
}
