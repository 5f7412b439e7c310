//! In-memory repository for tests and local runs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use game_core::{Account, AccountId, Character, ContainerInfo, EntityId, Item, Robot};

use super::error::{RepositoryError, Result};
use super::history::TransactionLogEvent;
use super::traits::{ChangeSet, RecordKey, Repository, Versioned};

#[derive(Default)]
struct Tables {
    items: HashMap<EntityId, Versioned<Item>>,
    containers: HashMap<EntityId, Versioned<ContainerInfo>>,
    characters: HashMap<EntityId, Versioned<Character>>,
    accounts: HashMap<AccountId, Versioned<Account>>,
    robots: HashMap<EntityId, Versioned<Robot>>,
    history: Vec<TransactionLogEvent>,
}

impl Tables {
    fn version_of(&self, key: RecordKey) -> u64 {
        fn version<K: Eq + Hash, V>(table: &HashMap<K, Versioned<V>>, id: &K) -> u64 {
            table.get(id).map_or(0, |record| record.version)
        }

        match key {
            RecordKey::Item(id) => version(&self.items, &id),
            RecordKey::Container(id) => version(&self.containers, &id),
            RecordKey::Character(id) => version(&self.characters, &id),
            RecordKey::Robot(id) => version(&self.robots, &id),
            RecordKey::Account(id) => version(&self.accounts, &id),
        }
    }
}

fn bump<K: Eq + Hash, V>(table: &mut HashMap<K, Versioned<V>>, id: K, value: V) {
    let version = table.get(&id).map_or(0, |record| record.version) + 1;
    table.insert(id, Versioned::new(version, value));
}

/// Repository keeping every table in a single lock.
///
/// Seeding helpers bypass version checks and are meant for fixtures.
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Ids handed out by [`Repository::allocate_id`] start at `first_id`.
    pub fn new(first_id: u64) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicU64::new(first_id),
        }
    }

    fn write_tables(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| RepositoryError::LockPoisoned)
    }

    fn read_tables(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| RepositoryError::LockPoisoned)
    }

    pub fn insert_item(&self, item: Item) -> Result<()> {
        bump(&mut self.write_tables()?.items, item.id, item);
        Ok(())
    }

    pub fn insert_container(&self, container: ContainerInfo) -> Result<()> {
        bump(&mut self.write_tables()?.containers, container.id, container);
        Ok(())
    }

    pub fn insert_character(&self, character: Character) -> Result<()> {
        bump(&mut self.write_tables()?.characters, character.id, character);
        Ok(())
    }

    pub fn insert_account(&self, account: Account) -> Result<()> {
        bump(&mut self.write_tables()?.accounts, account.id, account);
        Ok(())
    }

    pub fn insert_robot(&self, robot: Robot) -> Result<()> {
        bump(&mut self.write_tables()?.robots, robot.id, robot);
        Ok(())
    }

    /// History records committed so far, oldest first.
    pub fn history(&self) -> Result<Vec<TransactionLogEvent>> {
        Ok(self.read_tables()?.history.clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(1_000)
    }
}

impl Repository for InMemoryRepository {
    fn item(&self, id: EntityId) -> Result<Option<Versioned<Item>>> {
        Ok(self.read_tables()?.items.get(&id).cloned())
    }

    fn items_in(&self, container: EntityId) -> Result<Vec<Versioned<Item>>> {
        let tables = self.read_tables()?;
        let mut items: Vec<_> = tables
            .items
            .values()
            .filter(|record| record.value.parent == Some(container))
            .cloned()
            .collect();
        items.sort_by_key(|record| record.value.id);
        Ok(items)
    }

    fn container(&self, id: EntityId) -> Result<Option<Versioned<ContainerInfo>>> {
        Ok(self.read_tables()?.containers.get(&id).cloned())
    }

    fn character(&self, id: EntityId) -> Result<Option<Versioned<Character>>> {
        Ok(self.read_tables()?.characters.get(&id).cloned())
    }

    fn account(&self, id: AccountId) -> Result<Option<Versioned<Account>>> {
        Ok(self.read_tables()?.accounts.get(&id).cloned())
    }

    fn robot(&self, id: EntityId) -> Result<Option<Versioned<Robot>>> {
        Ok(self.read_tables()?.robots.get(&id).cloned())
    }

    fn allocate_id(&self) -> EntityId {
        EntityId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut tables = self.write_tables()?;

        if let Some((&key, _)) = changes
            .expected
            .iter()
            .find(|&(&key, &version)| tables.version_of(key) != version)
        {
            return Err(RepositoryError::Conflict(key));
        }

        for (id, item) in changes.items {
            bump(&mut tables.items, id, item);
        }
        for id in changes.deleted_items {
            tables.items.remove(&id);
        }
        for (id, container) in changes.containers {
            bump(&mut tables.containers, id, container);
        }
        for (id, character) in changes.characters {
            bump(&mut tables.characters, id, character);
        }
        for (id, account) in changes.accounts {
            bump(&mut tables.accounts, id, account);
        }
        for (id, robot) in changes.robots {
            bump(&mut tables.robots, id, robot);
        }
        tables.history.extend(changes.history);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ContainerKind;

    fn container() -> ContainerInfo {
        ContainerInfo {
            id: EntityId(10),
            kind: ContainerKind::Private,
            owner: EntityId(1),
        }
    }

    #[test]
    fn commit_bumps_versions() {
        let repo = InMemoryRepository::default();
        repo.insert_container(container()).unwrap();

        let mut changes = ChangeSet::default();
        changes.expected.insert(RecordKey::Container(EntityId(10)), 1);
        changes.containers.insert(EntityId(10), container());
        repo.commit(changes).unwrap();

        assert_eq!(repo.container(EntityId(10)).unwrap().unwrap().version, 2);
    }

    #[test]
    fn stale_version_rejects_whole_change_set() {
        let repo = InMemoryRepository::default();
        repo.insert_container(container()).unwrap();
        repo.insert_container(container()).unwrap(); // now at version 2

        let mut changes = ChangeSet::default();
        changes.expected.insert(RecordKey::Container(EntityId(10)), 1);
        changes.characters.insert(
            EntityId(1),
            Character::new(EntityId(1), AccountId(1)),
        );

        let err = repo.commit(changes).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Conflict(RecordKey::Container(EntityId(10)))
        ));
        assert!(repo.character(EntityId(1)).unwrap().is_none());
    }

    #[test]
    fn allocated_ids_are_unique() {
        let repo = InMemoryRepository::new(5);
        assert_eq!(repo.allocate_id(), EntityId(5));
        assert_eq!(repo.allocate_id(), EntityId(6));
    }
}
