use crate::state::ObjectGuid;

use super::context::{ObjectContext, ObjectEvent};
use super::error::LifecycleError;
use super::kinds::ObjectKind;
use super::state::{GoFlags, GoState, LootState};
use super::GameObjectInstance;

impl GameObjectInstance {
    /// Moves to `state`, recording `unit` as the cause.
    ///
    /// Collision follows the loot state for every type except doors and
    /// buttons, whose collision tracks the go-state only.
    pub fn set_loot_state(
        &mut self,
        state: LootState,
        unit: Option<ObjectGuid>,
        cx: &mut ObjectContext<'_>,
    ) {
        if self.loot_state != state {
            tracing::debug!(guid = %self.guid, from = %self.loot_state, to = %state, "loot state changed");
        }
        self.loot_state = state;
        self.loot_state_unit = unit;
        self.ai.on_loot_state_changed(state, unit);

        if self.template.is_door_or_button() {
            return;
        }
        let enabled = (self.go_state != GoState::Ready
            && matches!(state, LootState::Activated | LootState::JustDeactivated))
            || state == LootState::Ready;
        self.enable_collision(enabled, cx);
    }

    pub fn set_go_state(&mut self, state: GoState, cx: &mut ObjectContext<'_>) {
        self.go_state = state;
        self.ai.on_state_changed(state);
        if self.in_world && !self.template.is_transport() {
            self.enable_collision(state == GoState::Ready, cx);
        }
    }

    pub(crate) fn enable_collision(&mut self, enabled: bool, cx: &mut ObjectContext<'_>) {
        if !self.template.has_model || !self.in_world || self.collision == enabled {
            return;
        }
        self.collision = enabled;
        cx.emit(ObjectEvent::CollisionChanged { enabled });
    }

    /// Starts or stops a transport. `state` must be a transport ordinal.
    pub fn set_transport_state(&mut self, state: GoState, cx: &mut ObjectContext<'_>) {
        debug_assert!(
            state.is_transport_state(),
            "transport state below the active baseline: {state:?}"
        );
        let ObjectKind::Transport(transport) = &mut self.kind else {
            tracing::error!(guid = %self.guid, "set_transport_state on a non-transport");
            return;
        };
        if !state.is_transport_state() {
            tracing::error!(guid = %self.guid, ?state, "ignoring transport state below the active baseline");
            return;
        }
        if self.go_state == state {
            return;
        }
        if let GoState::TransportStopped(frame) = state {
            match transport.stop_frames.get(frame as usize) {
                Some(progress) => transport.path_progress_ms = u64::from(*progress),
                None => {
                    tracing::error!(guid = %self.guid, frame, "transport has no such stop frame");
                    return;
                }
            }
        }
        self.set_go_state(state, cx);
    }

    /// Opens a ready door or button and arms its auto-reset.
    ///
    /// `restore_ms` of 0 uses the template's auto-close time.
    pub fn use_door_or_button(
        &mut self,
        restore_ms: u32,
        alternative: bool,
        user: Option<ObjectGuid>,
        cx: &mut ObjectContext<'_>,
    ) -> Result<(), LifecycleError> {
        if self.loot_state != LootState::Ready {
            return Ok(());
        }
        let restore_ms = if restore_ms == 0 {
            self.template.auto_close_ms()
        } else {
            restore_ms
        };
        self.switch_door_or_button(true, alternative, cx);
        self.set_loot_state(LootState::Activated, user, cx);
        self.cooldown_ms = if restore_ms > 0 {
            cx.now_ms()? + u64::from(restore_ms)
        } else {
            0
        };
        Ok(())
    }

    /// Returns an activated door or button to its original posture.
    pub fn reset_door_or_button(&mut self, cx: &mut ObjectContext<'_>) {
        if matches!(
            self.loot_state,
            LootState::Ready | LootState::JustDeactivated
        ) {
            return;
        }
        self.flags.remove(GoFlags::IN_USE);
        self.set_go_state(self.prev_go_state, cx);
        self.set_loot_state(LootState::JustDeactivated, None, cx);
        self.cooldown_ms = 0;
    }

    fn switch_door_or_button(&mut self, activate: bool, alternative: bool, cx: &mut ObjectContext<'_>) {
        if activate {
            self.flags.insert(GoFlags::IN_USE);
        } else {
            self.flags.remove(GoFlags::IN_USE);
        }
        let next = if self.go_state == GoState::Ready {
            if alternative {
                GoState::ActiveAlternative
            } else {
                GoState::Active
            }
        } else {
            GoState::Ready
        };
        self.set_go_state(next, cx);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn door_collision_tracks_go_state_only() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut door = fx.spawn(DOOR, &mut cx);
        door.add_to_world(&mut cx);
        assert!(door.collision_enabled());
        cx.take_events();

        door.set_loot_state(LootState::Activated, None, &mut cx);
        assert!(door.collision_enabled());
        assert!(cx.events().is_empty());

        door.set_go_state(GoState::Active, &mut cx);
        assert!(!door.collision_enabled());
        assert_eq!(cx.events(), &[ObjectEvent::CollisionChanged { enabled: false }]);
    }

    #[test]
    fn chest_collision_follows_loot_state() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut chest = fx.spawn(CHEST, &mut cx);
        chest.add_to_world(&mut cx);
        assert!(!chest.collision_enabled());

        chest.set_loot_state(LootState::Ready, None, &mut cx);
        assert!(chest.collision_enabled());

        // Activated with a closed posture drops collision.
        chest.set_loot_state(LootState::Activated, None, &mut cx);
        assert!(!chest.collision_enabled());
    }

    #[test]
    fn door_use_toggles_and_auto_resets() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut door = fx.spawn(DOOR, &mut cx);
        door.set_loot_state(LootState::Ready, None, &mut cx);

        door.use_door_or_button(0, false, Some(PLAYER), &mut cx).unwrap();
        assert_eq!(door.go_state(), GoState::Active);
        assert_eq!(door.loot_state(), LootState::Activated);
        assert_eq!(door.loot_state_unit(), Some(PLAYER));
        assert!(door.flags().contains(GoFlags::IN_USE));
        assert_eq!(door.cooldown_ms(), fx.clock.now_ms() + 3_000);

        // A second use while activated is ignored.
        door.use_door_or_button(0, true, None, &mut cx).unwrap();
        assert_eq!(door.go_state(), GoState::Active);

        door.reset_door_or_button(&mut cx);
        assert_eq!(door.go_state(), GoState::Ready);
        assert_eq!(door.loot_state(), LootState::JustDeactivated);
        assert!(!door.flags().contains(GoFlags::IN_USE));
    }

    #[test]
    fn alternative_use_opens_the_other_way() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut button = fx.spawn(BUTTON, &mut cx);
        button.set_loot_state(LootState::Ready, None, &mut cx);
        button.use_door_or_button(500, true, None, &mut cx).unwrap();
        assert_eq!(button.go_state(), GoState::ActiveAlternative);
        assert_eq!(button.cooldown_ms(), fx.clock.now_ms() + 500);
    }

    #[test]
    fn transport_stops_at_frame_progress() {
        let fx = Fixture::new();
        let mut cx = fx.context();
        let mut transport = fx.spawn(TRANSPORT, &mut cx);
        assert_eq!(transport.go_state(), GoState::TransportActive);

        transport.set_transport_state(GoState::TransportStopped(1), &mut cx);
        assert_eq!(transport.go_state(), GoState::TransportStopped(1));
        let ObjectKind::Transport(state) = transport.kind() else {
            panic!("transport payload expected");
        };
        assert_eq!(state.path_progress_ms, 4_000);
    }
}
