//! In-memory threat tables and faction hostility.
use std::collections::{BTreeMap, HashMap, HashSet};

use world_core::{ObjectGuid, ThreatService};

/// Faction a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactionId(pub u32);

impl FactionId {
    pub const PLAYERS: Self = Self(1);
    pub const MONSTERS: Self = Self(2);
    /// Never hostile to anyone.
    pub const NEUTRAL: Self = Self(3);
}

/// Threat lists of every engaged unit on a map.
#[derive(Debug, Default)]
pub struct ThreatManager {
    /// owner → target → threat.
    tables: HashMap<ObjectGuid, BTreeMap<ObjectGuid, f32>>,
    factions: HashMap<ObjectGuid, FactionId>,
    /// Symmetric pairs, stored with the lower faction first.
    hostile: HashSet<(FactionId, FactionId)>,
}

impl ThreatManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Players and monsters fight each other; neutrals fight nobody.
    pub fn with_default_factions() -> Self {
        let mut manager = Self::new();
        manager.set_hostile(FactionId::PLAYERS, FactionId::MONSTERS);
        manager
    }

    pub fn set_hostile(&mut self, a: FactionId, b: FactionId) {
        self.hostile.insert(Self::pair(a, b));
    }

    pub fn set_faction(&mut self, unit: ObjectGuid, faction: FactionId) {
        self.factions.insert(unit, faction);
    }

    pub fn faction(&self, unit: ObjectGuid) -> Option<FactionId> {
        self.factions.get(&unit).copied()
    }

    /// Drops `unit` from the map: its own table, its faction, and every
    /// entry other units hold on it.
    pub fn remove_unit(&mut self, unit: ObjectGuid) {
        self.tables.remove(&unit);
        self.factions.remove(&unit);
        for table in self.tables.values_mut() {
            table.remove(&unit);
        }
        self.tables.retain(|_, table| !table.is_empty());
    }

    /// Units currently holding threat on `target`.
    pub fn threatened_by(&self, target: ObjectGuid) -> Vec<ObjectGuid> {
        let mut owners: Vec<ObjectGuid> = self
            .tables
            .iter()
            .filter(|(_, table)| table.contains_key(&target))
            .map(|(owner, _)| *owner)
            .collect();
        owners.sort_unstable();
        owners
    }

    pub fn threat(&self, owner: ObjectGuid, target: ObjectGuid) -> Option<f32> {
        self.tables.get(&owner)?.get(&target).copied()
    }

    fn pair(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl ThreatService for ThreatManager {
    fn add_threat(&mut self, owner: ObjectGuid, target: ObjectGuid, amount: f32) {
        *self
            .tables
            .entry(owner)
            .or_default()
            .entry(target)
            .or_insert(0.0) += amount.max(0.0);
    }

    fn clear_all_threat(&mut self, owner: ObjectGuid) {
        self.tables.remove(&owner);
    }

    /// Highest threat wins; ties go to the lowest guid.
    fn select_victim(&self, owner: ObjectGuid) -> Option<ObjectGuid> {
        let table = self.tables.get(&owner)?;
        let mut best: Option<(ObjectGuid, f32)> = None;
        for (target, threat) in table {
            if best.is_none_or(|(_, top)| *threat > top) {
                best = Some((*target, *threat));
            }
        }
        best.map(|(target, _)| target)
    }

    fn can_begin_combat(&self, a: ObjectGuid, b: ObjectGuid) -> bool {
        a != b && self.is_hostile(a, b)
    }

    fn is_hostile(&self, a: ObjectGuid, b: ObjectGuid) -> bool {
        match (self.faction(a), self.faction(b)) {
            (Some(fa), Some(fb)) => self.hostile.contains(&Self::pair(fa, fb)),
            _ => false,
        }
    }
}
