use crate::state::{ObjectGuid, Position};

/// Map-level unit queries made while advancing object lifecycles.
pub trait WorldOracle: Send + Sync {
    /// Whether the unit is currently in combat. Unknown units are not.
    fn is_in_combat(&self, unit: ObjectGuid) -> bool;

    fn is_player(&self, unit: ObjectGuid) -> bool;

    /// Nearest unit a trap at `position` should fire on.
    ///
    /// With an owner, only units hostile to the owner qualify; ownerless
    /// traps fire on any living player.
    fn find_trap_target(
        &self,
        position: &Position,
        radius: f32,
        owner: Option<ObjectGuid>,
    ) -> Option<ObjectGuid>;

    /// Number of players in the zone containing `position`.
    fn zone_population(&self, position: &Position) -> u32;
}
