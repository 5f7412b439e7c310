//! Item containers and their working-copy operations.
//!
//! A [`Container`] is a transaction-scoped working copy: it is assembled by the
//! persistence layer, mutated in memory, and written back explicitly. Nothing
//! here persists anything on its own.

use crate::item::{Item, ItemError};
use crate::state::EntityId;

/// Structural kind of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ContainerKind {
    /// Fixed storage of a docking base, shared by every character there.
    Public { base: EntityId },
    /// Cargo hold of a robot.
    RobotInventory { robot: EntityId },
    /// Owner-only storage (corporate hangars, personal crates).
    Private,
}

impl ContainerKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Public { .. } => "public",
            Self::RobotInventory { .. } => "robot_inventory",
            Self::Private => "private",
        }
    }
}

/// Persisted container header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerInfo {
    pub id: EntityId,
    pub kind: ContainerKind,
    pub owner: EntityId,
}

impl ContainerInfo {
    /// Whether `character` may open this container at all.
    pub fn accessible_by(&self, character: EntityId) -> bool {
        match self.kind {
            ContainerKind::Public { .. } => true,
            ContainerKind::RobotInventory { .. } | ContainerKind::Private => {
                self.owner == character
            }
        }
    }

    /// Whether an item stored here is visible to `character`.
    ///
    /// Public storage is partitioned per owner.
    pub fn item_visible_to(&self, item: &Item, character: EntityId) -> bool {
        match self.kind {
            ContainerKind::Public { .. } => item.owner == character,
            _ => true,
        }
    }
}

/// Result of taking units off a stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unstacked {
    pub item: Item,
    /// `true` when `item` is a fresh instance split off a larger stack,
    /// `false` when it is the original instance removed whole.
    pub split: bool,
}

/// Working copy of a container and the items loaded with it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub info: ContainerInfo,
    items: Vec<Item>,
}

impl Container {
    pub fn new(info: ContainerInfo, items: Vec<Item>) -> Self {
        let mut container = Self {
            info,
            items: Vec::with_capacity(items.len()),
        };
        for item in items {
            container.insert(item);
        }
        container
    }

    pub fn id(&self) -> EntityId {
        self.info.id
    }

    pub fn kind(&self) -> ContainerKind {
        self.info.kind
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: EntityId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_or_err(&self, id: EntityId) -> Result<&Item, ContainerError> {
        self.item(id).ok_or(ContainerError::ItemNotInContainer {
            item: id,
            container: self.info.id,
        })
    }

    /// Adds `item`, merging it into a compatible stack when allowed.
    ///
    /// Returns the id of the instance now holding the units: the existing
    /// stack on merge, otherwise `item.id`.
    pub fn add_item(&mut self, item: Item, allow_stacking: bool) -> EntityId {
        if allow_stacking
            && let Some(stack) = self.items.iter_mut().find(|s| s.stacks_with(&item))
        {
            stack.quantity += item.quantity;
            return stack.id;
        }

        let id = item.id;
        self.insert(item);
        id
    }

    /// Takes `amount` units of `id` out of the container.
    ///
    /// A stack larger than `amount` is decremented in place and a fresh
    /// instance with identity `fresh_id()` is returned. A stack of exactly
    /// `amount` is removed and returned as-is.
    pub fn unstack(
        &mut self,
        id: EntityId,
        amount: u32,
        fresh_id: impl FnOnce() -> EntityId,
    ) -> Result<Unstacked, ContainerError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ContainerError::ItemNotInContainer {
                item: id,
                container: self.info.id,
            })?;

        let stack = &mut self.items[index];
        if stack.quantity > amount {
            let item = stack.split_off(amount, fresh_id())?;
            return Ok(Unstacked { item, split: true });
        }
        if stack.quantity < amount {
            return Err(ItemError::InsufficientQuantity {
                item: id,
                available: stack.quantity,
                requested: amount,
            }
            .into());
        }

        let mut item = self.items.remove(index);
        item.parent = None;
        Ok(Unstacked { item, split: false })
    }

    fn insert(&mut self, mut item: Item) {
        item.parent = Some(self.info.id);
        self.items.push(item);
    }
}

/// Errors raised by container operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("item {item} is not in container {container}")]
    ItemNotInContainer { item: EntityId, container: EntityId },

    #[error(transparent)]
    Item(#[from] ItemError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDefinition, ItemEffect};
    use crate::item::ItemKind;
    use crate::state::DefinitionId;

    const OWNER: EntityId = EntityId(100);

    fn definition(id: u32, stackable: bool) -> ItemDefinition {
        ItemDefinition {
            id: DefinitionId(id),
            name: format!("def_{id}"),
            kind: ItemKind::Lottery,
            stackable,
            effect: ItemEffect::None,
        }
    }

    fn container(items: Vec<Item>) -> Container {
        Container::new(
            ContainerInfo {
                id: EntityId(10),
                kind: ContainerKind::Private,
                owner: OWNER,
            },
            items,
        )
    }

    #[test]
    fn unstack_splits_larger_stack() {
        let stack = Item::new(EntityId(1), &definition(1, true), OWNER, 3);
        let mut container = container(vec![stack]);

        let taken = container.unstack(EntityId(1), 1, || EntityId(99)).unwrap();

        assert!(taken.split);
        assert_eq!(taken.item.id, EntityId(99));
        assert_eq!(taken.item.quantity, 1);
        assert_eq!(container.item(EntityId(1)).unwrap().quantity, 2);
    }

    #[test]
    fn unstack_consumes_single_instance_directly() {
        let single = Item::new(EntityId(1), &definition(1, true), OWNER, 1);
        let mut container = container(vec![single]);

        let taken = container
            .unstack(EntityId(1), 1, || panic!("no fresh id needed"))
            .unwrap();

        assert!(!taken.split);
        assert_eq!(taken.item.id, EntityId(1));
        assert!(container.items().is_empty());
    }

    #[test]
    fn unstack_missing_item_fails() {
        let mut container = container(vec![]);

        let err = container.unstack(EntityId(5), 1, || EntityId(6)).unwrap_err();

        assert_eq!(
            err,
            ContainerError::ItemNotInContainer {
                item: EntityId(5),
                container: EntityId(10)
            }
        );
    }

    #[test]
    fn add_item_merges_compatible_stacks_only_when_allowed() {
        let stack = Item::new(EntityId(1), &definition(1, true), OWNER, 2);
        let mut container = container(vec![stack]);

        let merged = container.add_item(Item::new(EntityId(2), &definition(1, true), OWNER, 1), true);
        assert_eq!(merged, EntityId(1));
        assert_eq!(container.items().len(), 1);
        assert_eq!(container.items()[0].quantity, 3);

        let separate =
            container.add_item(Item::new(EntityId(3), &definition(1, true), OWNER, 1), false);
        assert_eq!(separate, EntityId(3));
        assert_eq!(container.items().len(), 2);
        assert_eq!(container.items()[1].parent, Some(EntityId(10)));
    }

    #[test]
    fn public_storage_is_partitioned_by_owner() {
        let info = ContainerInfo {
            id: EntityId(10),
            kind: ContainerKind::Public { base: EntityId(3) },
            owner: EntityId::NONE,
        };
        let mine = Item::new(EntityId(1), &definition(1, true), OWNER, 1);
        let theirs = Item::new(EntityId(2), &definition(1, true), EntityId(7), 1);

        assert!(info.accessible_by(OWNER));
        assert!(info.item_visible_to(&mine, OWNER));
        assert!(!info.item_visible_to(&theirs, OWNER));
    }
}
