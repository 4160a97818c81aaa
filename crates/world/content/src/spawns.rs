//! Spawn placement records.
use world_core::{
    BoundaryId, CreateParams, GoState, MapId, ObjectGuid, Position, ReactState, SpawnId,
    SpawnInfo,
};

/// A persisted game-object placement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSpawn {
    pub spawn: SpawnInfo,
    pub entry: u32,
    pub map: MapId,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub respawn_delay_secs: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub spawned_by_default: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub go_state: Option<GoState>,
}

impl ObjectSpawn {
    /// Construction parameters for a live instance of this placement.
    pub fn create_params(&self, guid: ObjectGuid) -> CreateParams {
        let mut params = CreateParams::new(guid, self.entry, self.position)
            .with_spawn(self.spawn)
            .with_respawn_delay(self.respawn_delay_secs)
            .spawned_by_default(self.spawned_by_default);
        if let Some(state) = self.go_state {
            params = params.with_go_state(state);
        }
        params
    }
}

/// A creature placement with its behavior settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureSpawn {
    pub spawn_id: SpawnId,
    pub entry: u32,
    pub map: MapId,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub react_state: ReactState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boundary: Option<BoundaryId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub negate_boundary: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub civilian: bool,
}

/// All placements of a data set.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTable {
    #[cfg_attr(feature = "serde", serde(default))]
    pub objects: Vec<ObjectSpawn>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub creatures: Vec<CreatureSpawn>,
}

impl SpawnTable {
    pub fn object(&self, spawn_id: SpawnId) -> Option<&ObjectSpawn> {
        self.objects
            .iter()
            .find(|spawn| spawn.spawn.spawn_id == spawn_id)
    }

    /// Placements on `map`.
    pub fn objects_on(&self, map: MapId) -> impl Iterator<Item = &ObjectSpawn> + '_ {
        self.objects.iter().filter(move |spawn| spawn.map == map)
    }

    pub fn creatures_on(&self, map: MapId) -> impl Iterator<Item = &CreatureSpawn> + '_ {
        self.creatures.iter().filter(move |spawn| spawn.map == map)
    }
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}
