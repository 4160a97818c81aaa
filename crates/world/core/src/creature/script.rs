use crate::state::ObjectGuid;

/// Behavior script of a creature. Hooks default to no-ops.
pub trait CreatureScript: Send {
    /// Re-initializes scripted behavior, e.g. after evading.
    fn reset(&mut self) {}

    fn just_engaged_with(&mut self, _target: ObjectGuid) {}

    fn just_reached_home(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullCreatureScript;

impl CreatureScript for NullCreatureScript {}
