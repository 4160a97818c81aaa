//! Per-map unit positions and the [`WorldOracle`] view over them.
use std::collections::BTreeMap;

use world_core::{ObjectGuid, Position, ThreatService, UnitKind, UnitView, WorldOracle};

use crate::threat::ThreatManager;

/// Live state of a connected player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    pub position: Position,
    pub alive: bool,
    pub in_combat: bool,
    /// Stealthed players are noticed with an alert instead of an attack.
    pub stealthed: bool,
    pub vehicle: Option<ObjectGuid>,
}

impl PlayerState {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            alive: true,
            in_combat: false,
            stealthed: false,
            vehicle: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CreatureEntry {
    view: UnitView,
    in_combat: bool,
}

/// Where every unit on the map stands.
#[derive(Debug, Default)]
pub struct UnitIndex {
    players: BTreeMap<ObjectGuid, PlayerState>,
    creatures: BTreeMap<ObjectGuid, CreatureEntry>,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, guid: ObjectGuid) -> Option<&PlayerState> {
        self.players.get(&guid)
    }

    pub(crate) fn player_mut(&mut self, guid: ObjectGuid) -> Option<&mut PlayerState> {
        self.players.get_mut(&guid)
    }

    pub(crate) fn upsert_player(&mut self, guid: ObjectGuid, state: PlayerState) {
        self.players.insert(guid, state);
    }

    pub(crate) fn remove_player(&mut self, guid: ObjectGuid) -> Option<PlayerState> {
        self.players.remove(&guid)
    }

    pub(crate) fn set_creature(&mut self, view: UnitView, in_combat: bool) {
        self.creatures
            .insert(view.guid, CreatureEntry { view, in_combat });
    }

    pub fn players(&self) -> impl Iterator<Item = (ObjectGuid, &PlayerState)> + '_ {
        self.players.iter().map(|(guid, state)| (*guid, state))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Snapshot of any unit, as perception sees it.
    pub fn view(&self, guid: ObjectGuid) -> Option<UnitView> {
        if let Some(player) = self.players.get(&guid) {
            return Some(UnitView {
                guid,
                kind: UnitKind::Player,
                position: player.position,
                alive: player.alive,
                attackable: player.alive,
            });
        }
        self.creatures.get(&guid).map(|entry| entry.view)
    }

    /// Players within `range` of `position`, nearest first.
    pub fn players_near(&self, position: &Position, range: f32) -> Vec<UnitView> {
        let mut near: Vec<(f32, UnitView)> = self
            .players
            .keys()
            .filter_map(|guid| self.view(*guid))
            .map(|view| (view.position.distance_2d(position), view))
            .filter(|(distance, _)| *distance <= range)
            .collect();
        near.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.guid.cmp(&b.1.guid)));
        near.into_iter().map(|(_, view)| view).collect()
    }

    fn all_views(&self) -> impl Iterator<Item = UnitView> + '_ {
        self.players
            .keys()
            .filter_map(|guid| self.view(*guid))
            .chain(self.creatures.values().map(|entry| entry.view))
    }
}

/// Read-only map view handed to object lifecycles.
pub(crate) struct MapView<'a> {
    units: &'a UnitIndex,
    threat: &'a ThreatManager,
}

impl<'a> MapView<'a> {
    pub(crate) fn new(units: &'a UnitIndex, threat: &'a ThreatManager) -> Self {
        Self { units, threat }
    }
}

impl WorldOracle for MapView<'_> {
    fn is_in_combat(&self, unit: ObjectGuid) -> bool {
        if let Some(player) = self.units.players.get(&unit) {
            return player.in_combat;
        }
        self.units
            .creatures
            .get(&unit)
            .is_some_and(|entry| entry.in_combat)
    }

    fn is_player(&self, unit: ObjectGuid) -> bool {
        self.units.players.contains_key(&unit)
    }

    fn find_trap_target(
        &self,
        position: &Position,
        radius: f32,
        owner: Option<ObjectGuid>,
    ) -> Option<ObjectGuid> {
        self.units
            .all_views()
            .filter(|view| view.alive && view.attackable)
            .filter(|view| match owner {
                Some(owner) => view.guid != owner && self.threat.is_hostile(owner, view.guid),
                None => view.kind == UnitKind::Player,
            })
            .map(|view| (view.position.distance_2d(position), view.guid))
            .filter(|(distance, _)| *distance <= radius)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, guid)| guid)
    }

    /// One zone per map: every connected player counts.
    fn zone_population(&self, _position: &Position) -> u32 {
        u32::try_from(self.units.players.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threat::FactionId;

    fn index() -> UnitIndex {
        let mut units = UnitIndex::new();
        units.upsert_player(ObjectGuid(1), PlayerState::at(Position::new(3.0, 0.0, 0.0)));
        units.upsert_player(ObjectGuid(2), PlayerState::at(Position::new(1.0, 0.0, 0.0)));
        let mut wolf = UnitView {
            guid: ObjectGuid(10),
            kind: UnitKind::Creature,
            position: Position::new(0.5, 0.0, 0.0),
            alive: true,
            attackable: true,
        };
        units.set_creature(wolf, true);
        wolf.guid = ObjectGuid(11);
        wolf.alive = false;
        units.set_creature(wolf, false);
        units
    }

    #[test]
    fn ownerless_trap_targets_nearest_player() {
        let units = index();
        let threat = ThreatManager::new();
        let view = MapView::new(&units, &threat);
        let origin = Position::new(0.0, 0.0, 0.0);

        assert_eq!(view.find_trap_target(&origin, 5.0, None), Some(ObjectGuid(2)));
        assert_eq!(view.find_trap_target(&origin, 0.5, None), None);
    }

    #[test]
    fn owned_trap_targets_living_hostiles_only() {
        let units = index();
        let mut threat = ThreatManager::with_default_factions();
        threat.set_faction(ObjectGuid(1), FactionId::PLAYERS);
        threat.set_faction(ObjectGuid(2), FactionId::PLAYERS);
        threat.set_faction(ObjectGuid(10), FactionId::MONSTERS);
        threat.set_faction(ObjectGuid(11), FactionId::MONSTERS);
        let view = MapView::new(&units, &threat);
        let origin = Position::new(0.0, 0.0, 0.0);

        assert_eq!(
            view.find_trap_target(&origin, 5.0, Some(ObjectGuid(1))),
            Some(ObjectGuid(10))
        );
        assert_eq!(
            view.find_trap_target(&origin, 5.0, Some(ObjectGuid(10))),
            Some(ObjectGuid(2))
        );
    }

    #[test]
    fn combat_and_population_queries() {
        let mut units = index();
        units.player_mut(ObjectGuid(1)).unwrap().in_combat = true;
        let threat = ThreatManager::new();
        let view = MapView::new(&units, &threat);

        assert!(view.is_in_combat(ObjectGuid(1)));
        assert!(!view.is_in_combat(ObjectGuid(2)));
        assert!(view.is_in_combat(ObjectGuid(10)));
        assert!(view.is_player(ObjectGuid(2)));
        assert!(!view.is_player(ObjectGuid(10)));
        assert_eq!(view.zone_population(&Position::new(0.0, 0.0, 0.0)), 2);
    }

    #[test]
    fn players_near_sorted_by_distance() {
        let units = index();
        let near = units.players_near(&Position::new(0.0, 0.0, 0.0), 10.0);
        let guids: Vec<_> = near.iter().map(|v| v.guid).collect();
        assert_eq!(guids, vec![ObjectGuid(2), ObjectGuid(1)]);
    }
}
