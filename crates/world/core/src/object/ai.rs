use crate::state::ObjectGuid;

use super::state::{GoState, LootState};

/// Behavior script attached to a game object.
///
/// The lifecycle calls these hooks synchronously from inside a tick. Every
/// hook has a no-op default so scripts only override what they react to.
pub trait ObjectAi: Send {
    fn update(&mut self, _diff: u32) {}

    /// Called when a compatibility-mode instance comes back.
    fn reset(&mut self) {}

    fn on_loot_state_changed(&mut self, _state: LootState, _unit: Option<ObjectGuid>) {}

    fn on_state_changed(&mut self, _state: GoState) {}

    fn event_inform(&mut self, _event_id: u32, _invoker: Option<ObjectGuid>) {}

    fn damaged(&mut self, _attacker: Option<ObjectGuid>, _event_id: Option<u32>) {}

    fn destroyed(&mut self, _attacker: Option<ObjectGuid>, _event_id: Option<u32>) {}

    /// Returns true when the script handled the player's interaction.
    fn gossip_hello(&mut self, _player: ObjectGuid) -> bool {
        false
    }
}

/// Script for objects without custom behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObjectAi;

impl ObjectAi for NullObjectAi {}
