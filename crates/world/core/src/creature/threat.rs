use crate::state::ObjectGuid;

use super::CreatureEvent;

/// Shared threat and combat bookkeeping.
pub trait ThreatService {
    fn add_threat(&mut self, owner: ObjectGuid, target: ObjectGuid, amount: f32);

    fn clear_all_threat(&mut self, owner: ObjectGuid);

    /// Highest-threat valid target of `owner`.
    fn select_victim(&self, owner: ObjectGuid) -> Option<ObjectGuid>;

    fn can_begin_combat(&self, a: ObjectGuid, b: ObjectGuid) -> bool;

    fn is_hostile(&self, a: ObjectGuid, b: ObjectGuid) -> bool;
}

/// Per-call context of the creature controllers.
pub struct CombatContext<'a> {
    threat: &'a mut dyn ThreatService,
    events: Vec<CreatureEvent>,
}

impl<'a> CombatContext<'a> {
    pub fn new(threat: &'a mut dyn ThreatService) -> Self {
        Self {
            threat,
            events: Vec::new(),
        }
    }

    pub fn threat(&mut self) -> &mut dyn ThreatService {
        &mut *self.threat
    }

    pub fn emit(&mut self, event: CreatureEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CreatureEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<CreatureEvent> {
        std::mem::take(&mut self.events)
    }
}
