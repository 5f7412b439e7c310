//! Static item definitions and the kind-specific configuration they carry.

use std::collections::HashMap;

use crate::actor::{BoostSpec, Tint};
use crate::item::ItemKind;
use crate::state::DefinitionId;

/// Immutable description of an item type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: DefinitionId,
    pub name: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: ItemEffect,
}

/// Kind-specific payload of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    #[default]
    None,
    Lottery(RewardTable),
    Boost(BoostSpec),
    Paint(Tint),
    TemplateUnpack { produces: DefinitionId },
    StatReset,
    TeleportRedeem { base_id: u32 },
}

/// One weighted entry of a lottery reward table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardEntry {
    pub definition: DefinitionId,
    pub weight: u32,
}

/// Weighted reward table of a lottery item.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RewardTable {
    pub entries: Vec<RewardEntry>,
}

impl RewardTable {
    pub fn new(entries: Vec<RewardEntry>) -> Self {
        Self { entries }
    }

    /// Sum of all weights; a roll must fall in `0..total_weight()`.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// Maps a roll onto an entry by cumulative weight.
    ///
    /// The roll is reduced modulo the total weight, so any `u64` is accepted.
    /// Returns `None` when the table is empty or every weight is zero.
    pub fn pick(&self, roll: u64) -> Option<DefinitionId> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }

        let mut remaining = roll % total;
        for entry in &self.entries {
            let weight = u64::from(entry.weight);
            if remaining < weight {
                return Some(entry.definition);
            }
            remaining -= weight;
        }

        None
    }
}

/// Lookup table of every known item definition.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    definitions: HashMap<DefinitionId, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn get(&self, id: DefinitionId) -> Option<&ItemDefinition> {
        self.definitions.get(&id)
    }

    pub fn insert(&mut self, definition: ItemDefinition) {
        self.definitions.insert(definition.id, definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
