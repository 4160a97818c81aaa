use std::collections::HashMap;

use world_core::{Difficulty, SpellInfo, SpellOracle};

/// Spell records keyed by `(id, difficulty)`.
///
/// Lookups without a difficulty-specific record fall back to `Normal`.
#[derive(Debug, Default)]
pub struct SpellRegistry {
    spells: HashMap<(u32, Difficulty), SpellInfo>,
}

impl SpellRegistry {
    pub fn new(spells: impl IntoIterator<Item = SpellInfo>) -> Self {
        Self {
            spells: spells
                .into_iter()
                .map(|spell| ((spell.id, spell.difficulty), spell))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellOracle for SpellRegistry {
    fn spell(&self, id: u32, difficulty: Difficulty) -> Option<&SpellInfo> {
        self.spells
            .get(&(id, difficulty))
            .or_else(|| self.spells.get(&(id, Difficulty::Normal)))
    }
}
