//! Repository contract for the records item activation touches.

use std::collections::{HashMap, HashSet};
use std::fmt;

use game_core::{Account, AccountId, Character, ContainerInfo, EntityId, Item, Robot};

use super::error::Result;
use super::history::TransactionLogEvent;

/// A record together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }
}

/// Identity of a persisted record across all tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Item(EntityId),
    Container(EntityId),
    Character(EntityId),
    Robot(EntityId),
    Account(AccountId),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Item(id) => write!(f, "item {id}"),
            RecordKey::Container(id) => write!(f, "container {id}"),
            RecordKey::Character(id) => write!(f, "character {id}"),
            RecordKey::Robot(id) => write!(f, "robot {id}"),
            RecordKey::Account(id) => write!(f, "{id}"),
        }
    }
}

/// Everything one transaction wants to write.
///
/// `expected` holds the version each record had when the transaction first
/// read it; a record that did not exist is expected at version 0.
#[derive(Debug, Default, Clone)]
pub struct ChangeSet {
    pub expected: HashMap<RecordKey, u64>,
    pub items: HashMap<EntityId, Item>,
    pub deleted_items: HashSet<EntityId>,
    pub containers: HashMap<EntityId, ContainerInfo>,
    pub characters: HashMap<EntityId, Character>,
    pub accounts: HashMap<AccountId, Account>,
    pub robots: HashMap<EntityId, Robot>,
    pub history: Vec<TransactionLogEvent>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.deleted_items.is_empty()
            && self.containers.is_empty()
            && self.characters.is_empty()
            && self.accounts.is_empty()
            && self.robots.is_empty()
            && self.history.is_empty()
    }
}

/// Storage for mutable game records.
///
/// Reads are point-in-time; `commit` is all-or-nothing.
pub trait Repository: Send + Sync {
    fn item(&self, id: EntityId) -> Result<Option<Versioned<Item>>>;

    /// Every item whose parent is `container`.
    fn items_in(&self, container: EntityId) -> Result<Vec<Versioned<Item>>>;

    fn container(&self, id: EntityId) -> Result<Option<Versioned<ContainerInfo>>>;

    fn character(&self, id: EntityId) -> Result<Option<Versioned<Character>>>;

    fn account(&self, id: AccountId) -> Result<Option<Versioned<Account>>>;

    fn robot(&self, id: EntityId) -> Result<Option<Versioned<Robot>>>;

    /// Reserves a fresh entity id. Ids are never reused, even on rollback.
    fn allocate_id(&self) -> EntityId;

    /// Applies `changes` atomically.
    ///
    /// Fails with [`RepositoryError::Conflict`](super::RepositoryError::Conflict)
    /// if any expected version is stale; nothing is written in that case.
    fn commit(&self, changes: ChangeSet) -> Result<()>;
}
