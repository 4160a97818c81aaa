use crate::state::ObjectGuid;

use super::context::{ObjectContext, ObjectEvent};
use super::kinds::ObjectKind;
use super::state::{DestructibleState, GoFlags};
use super::template::TemplateKind;
use super::GameObjectInstance;

impl GameObjectInstance {
    /// Applies `delta` to a destructible building's health.
    ///
    /// Health is clamped to `[0, max]`; a destroyed building ignores further
    /// damage. Calling this on another type is a programming error.
    pub fn modify_health(
        &mut self,
        delta: i32,
        attacker: Option<ObjectGuid>,
        cx: &mut ObjectContext<'_>,
    ) {
        let damaged_health = match &self.template.kind {
            TemplateKind::DestructibleBuilding(data) => data.damaged_health,
            _ => 0,
        };
        let ObjectKind::Building(building) = &mut self.kind else {
            debug_assert!(false, "modify_health on a non-destructible object");
            tracing::error!(guid = %self.guid, "modify_health on a non-destructible object");
            return;
        };
        if building.health == 0 && delta < 0 {
            return;
        }
        let health = (i64::from(building.health) + i64::from(delta))
            .clamp(0, i64::from(building.max_health)) as u32;
        building.health = health;
        self.anim_progress = if building.max_health > 0 {
            (u64::from(health) * 255 / u64::from(building.max_health)) as u8
        } else {
            0
        };

        let next = if health == 0 {
            DestructibleState::Destroyed
        } else if health <= damaged_health {
            DestructibleState::Damaged
        } else if health == building.max_health {
            DestructibleState::Intact
        } else {
            building.state
        };
        if next != building.state {
            self.set_destructible_state(next, attacker, false, cx);
        }
    }

    /// Moves a destructible building to `state`, firing its script events.
    pub fn set_destructible_state(
        &mut self,
        state: DestructibleState,
        attacker: Option<ObjectGuid>,
        reset_health: bool,
        cx: &mut ObjectContext<'_>,
    ) {
        let TemplateKind::DestructibleBuilding(data) = &self.template.kind else {
            debug_assert!(false, "set_destructible_state on a non-destructible object");
            tracing::error!(guid = %self.guid, "set_destructible_state on a non-destructible object");
            return;
        };
        let (damaged_event, destroyed_event, rebuilding_event) =
            (data.damaged_event, data.destroyed_event, data.rebuilding_event);

        let max_health = match &mut self.kind {
            ObjectKind::Building(building) => {
                building.state = state;
                building.max_health
            }
            _ => return,
        };

        match state {
            DestructibleState::Intact => {
                self.flags.remove(GoFlags::DAMAGED | GoFlags::DESTROYED);
                if reset_health {
                    self.set_building_health(max_health);
                }
                self.enable_collision(true, cx);
            }
            DestructibleState::Damaged => {
                if let Some(event) = damaged_event {
                    self.ai.event_inform(event, attacker);
                }
                self.ai.damaged(attacker, damaged_event);
                self.flags.remove(GoFlags::DESTROYED);
                self.flags.insert(GoFlags::DAMAGED);
                if reset_health {
                    let health = match &self.template.kind {
                        TemplateKind::DestructibleBuilding(data) => data.damaged_health,
                        _ => 0,
                    };
                    self.set_building_health(health);
                }
            }
            DestructibleState::Destroyed => {
                if let Some(event) = destroyed_event {
                    self.ai.event_inform(event, attacker);
                }
                self.ai.destroyed(attacker, destroyed_event);
                self.flags.remove(GoFlags::DAMAGED);
                self.flags.insert(GoFlags::DESTROYED);
                if reset_health {
                    self.set_building_health(0);
                }
                self.enable_collision(false, cx);
            }
            DestructibleState::Rebuilding => {
                if let Some(event) = rebuilding_event {
                    self.ai.event_inform(event, attacker);
                }
                self.flags.remove(GoFlags::DAMAGED | GoFlags::DESTROYED);
                self.set_building_health(max_health);
                self.enable_collision(true, cx);
            }
        }
        tracing::debug!(guid = %self.guid, %state, "destructible state changed");
        cx.emit(ObjectEvent::DestructibleStateChanged { state });
    }

    /// Current health of a destructible building.
    pub fn building_health(&self) -> Option<u32> {
        match &self.kind {
            ObjectKind::Building(building) => Some(building.health),
            _ => None,
        }
    }

    fn set_building_health(&mut self, health: u32) {
        if let ObjectKind::Building(building) = &mut self.kind {
            building.health = health.min(building.max_health);
            self.anim_progress = if building.max_health > 0 {
                (u64::from(building.health) * 255 / u64::from(building.max_health)) as u8
            } else {
                0
            };
        }
    }
}
