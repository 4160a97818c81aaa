use crate::state::ObjectGuid;

use super::context::{ObjectContext, ObjectEvent};
use super::error::LifecycleError;
use super::kinds::{LootRoll, ObjectKind};
use super::state::{GoFlags, GoState, LootState};
use super::template::TemplateKind;
use super::GameObjectInstance;

/// The unit using an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interactor {
    pub guid: ObjectGuid,
    pub is_player: bool,
}

impl Interactor {
    pub const fn player(guid: ObjectGuid) -> Self {
        Self {
            guid,
            is_player: true,
        }
    }

    pub const fn creature(guid: ObjectGuid) -> Self {
        Self {
            guid,
            is_player: false,
        }
    }
}

/// Result of [`GameObjectInstance::use_object`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum UseOutcome {
    /// A script consumed the interaction.
    Handled,
    Used,
    OnCooldown,
    /// The object is not in a usable state right now.
    NotUsable,
    /// The type has no built-in use behavior.
    Unsupported,
}

impl GameObjectInstance {
    /// Applies a unit's interaction.
    pub fn use_object(
        &mut self,
        user: Interactor,
        cx: &mut ObjectContext<'_>,
    ) -> Result<UseOutcome, LifecycleError> {
        if user.is_player && self.ai.gossip_hello(user.guid) {
            return Ok(UseOutcome::Handled);
        }
        let now_ms = cx.now_ms()?;
        if self.use_cooldown_ms > now_ms {
            return Ok(UseOutcome::OnCooldown);
        }
        if self.template.use_cooldown_secs > 0 {
            self.use_cooldown_ms = now_ms + u64::from(self.template.use_cooldown_secs) * 1000;
        }

        let template = std::sync::Arc::clone(&self.template);
        let outcome = match &template.kind {
            TemplateKind::Door(_) | TemplateKind::Button(_) => {
                if self.loot_state != LootState::Ready {
                    return Ok(UseOutcome::NotUsable);
                }
                self.use_door_or_button(0, false, Some(user.guid), cx)?;
                UseOutcome::Used
            }
            TemplateKind::Trap(data) => {
                if let Some(spell) = data.spell {
                    self.cast_spell(spell, self.guid, Some(user.guid), cx)?;
                }
                self.cooldown_ms = now_ms + u64::from(data.cooldown_secs) * 1000;
                if data.charges == 1 {
                    self.set_loot_state(LootState::JustDeactivated, None, cx);
                }
                UseOutcome::Used
            }
            TemplateKind::Goober(data) => {
                if self.loot_state == LootState::Activated {
                    return Ok(UseOutcome::NotUsable);
                }
                if let Some(event_id) = data.event_id {
                    self.ai.event_inform(event_id, Some(user.guid));
                }
                if let Some(trap) = self.linked_trap {
                    cx.emit(ObjectEvent::TriggerLinkedTrap {
                        trap,
                        user: user.guid,
                    });
                }
                self.flags.insert(GoFlags::IN_USE);
                self.set_loot_state(LootState::Activated, Some(user.guid), cx);
                if data.custom_anim {
                    cx.emit(ObjectEvent::CustomAnimation { anim: 0 });
                } else {
                    self.set_go_state(GoState::Active, cx);
                }
                self.cooldown_ms = now_ms + u64::from(data.auto_close_ms);
                if user.is_player {
                    self.add_unique_use(user.guid);
                } else {
                    self.add_use();
                }
                UseOutcome::Used
            }
            TemplateKind::Chest(_) => {
                if self.loot_state != LootState::Ready {
                    return Ok(UseOutcome::NotUsable);
                }
                self.set_loot_state(LootState::Activated, Some(user.guid), cx);
                self.add_use();
                UseOutcome::Used
            }
            TemplateKind::SpellCaster(data) => {
                if let Some(spell) = data.spell {
                    self.cast_spell(spell, self.guid, Some(user.guid), cx)?;
                }
                self.add_use();
                UseOutcome::Used
            }
            _ => UseOutcome::Unsupported,
        };
        tracing::trace!(guid = %self.guid, user = %user.guid, %outcome, "game object used");
        Ok(outcome)
    }

    /// Starts a group loot roll on an opened chest.
    pub fn start_loot_roll(&mut self, group: u64, duration_ms: u32) {
        if let ObjectKind::Chest(state) = &mut self.kind {
            state.loot_roll = Some(LootRoll {
                group,
                remaining_ms: duration_ms,
            });
        }
    }

    /// Closes an opened chest after looting.
    pub fn release_loot(&mut self, fully_looted: bool, cx: &mut ObjectContext<'_>) {
        if self.loot_state != LootState::Activated {
            return;
        }
        if let ObjectKind::Chest(state) = &mut self.kind {
            state.loot_roll = None;
        }
        let next = if fully_looted {
            LootState::JustDeactivated
        } else {
            LootState::Ready
        };
        self.set_loot_state(next, None, cx);
    }
}
