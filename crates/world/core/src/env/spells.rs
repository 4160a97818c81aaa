/// Map difficulty; spell records may differ per difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Normal,
    Heroic,
    Mythic,
}

/// Spell record as seen by the object lifecycle.
///
/// Resolution of the spell itself happens elsewhere; the lifecycle only
/// checks the record exists before emitting a cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellInfo {
    pub id: u32,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulty: Difficulty,
}

/// Registry of spell records indexed by `(id, difficulty)`.
///
/// Lookups fall back to the `Normal` record when no difficulty-specific
/// entry exists.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: u32, difficulty: Difficulty) -> Option<&SpellInfo>;
}
