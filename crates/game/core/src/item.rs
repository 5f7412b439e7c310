//! Inventory items and stack manipulation.

use crate::catalog::ItemDefinition;
use crate::state::{DefinitionId, EntityId};

/// Kind tag used to select the activation behavior of an item.
///
/// The tag travels with every item instance so the dispatcher can pick a
/// strategy without inspecting the definition payload.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    /// Opens into one weighted-random reward item.
    Lottery,
    /// Grants a time-limited account bonus.
    Boost,
    /// Applies a cosmetic tint to the robot owning the inventory.
    Paint,
    /// Unpacks into a non-stackable item built from a template definition.
    TemplateUnpack,
    /// Resets the character build and forces a relog.
    StatReset,
    /// Redeems into a teleport to a fixed destination.
    TeleportRedeem,
    /// Plain goods with no activation behavior.
    Commodity,
}

/// A single persisted item instance (possibly a stack).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: EntityId,
    pub definition: DefinitionId,
    pub kind: ItemKind,
    pub quantity: u32,
    pub owner: EntityId,
    pub stackable: bool,
    /// Container currently holding the item, if any.
    pub parent: Option<EntityId>,
}

impl Item {
    /// Materializes a new instance of `definition` with the given identity.
    pub fn new(id: EntityId, definition: &ItemDefinition, owner: EntityId, quantity: u32) -> Self {
        Self {
            id,
            definition: definition.id,
            kind: definition.kind,
            quantity,
            owner,
            stackable: definition.stackable,
            parent: None,
        }
    }

    /// Splits `amount` units off this stack into a fresh instance.
    ///
    /// The caller decides whether splitting is needed at all: when the stack
    /// holds exactly `amount` units the original instance should be consumed
    /// directly instead (see [`Container::unstack`](crate::container::Container::unstack)).
    pub fn split_off(&mut self, amount: u32, fresh_id: EntityId) -> Result<Item, ItemError> {
        if amount == 0 {
            return Err(ItemError::ZeroAmount);
        }
        if self.quantity <= amount {
            return Err(ItemError::InsufficientQuantity {
                item: self.id,
                available: self.quantity,
                requested: amount,
            });
        }

        self.quantity -= amount;

        Ok(Item {
            id: fresh_id,
            quantity: amount,
            parent: None,
            ..self.clone()
        })
    }

    /// True when `other` can be merged into this stack.
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.stackable
            && other.stackable
            && self.definition == other.definition
            && self.owner == other.owner
    }
}

/// Errors raised while manipulating item stacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("cannot unstack zero units")]
    ZeroAmount,

    #[error("item {item} holds {available} units, {requested} requested")]
    InsufficientQuantity {
        item: EntityId,
        available: u32,
        requested: u32,
    },
}
