//! Unit-of-work handle threaded through every mutating operation.
//!
//! A [`Transaction`] reads through the repository, stages writes in a
//! [`ChangeSet`], and commits them in one step. Callbacks registered with
//! [`Transaction::on_committed`] run only after a successful commit. Dropping
//! a transaction without committing discards everything it staged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use game_core::{
    Account, AccountId, Character, Container, EntityId, Item, ItemDefinition, Robot,
};

use crate::api::{Missing, Result, RuntimeError};
use crate::repository::{ChangeSet, RecordKey, Repository, TransactionLogEvent, Versioned};

type CommitCallback = Box<dyn FnOnce() -> Result<()> + Send>;

/// Entry point for transactional access to a repository.
#[derive(Clone)]
pub struct Store {
    repository: Arc<dyn Repository>,
    next_tx: Arc<AtomicU64>,
}

impl Store {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            next_tx: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn begin(&self) -> Transaction {
        let id = self.next_tx.fetch_add(1, Ordering::Relaxed);
        Transaction {
            id,
            repository: Arc::clone(&self.repository),
            changes: ChangeSet::default(),
            callbacks: Vec::new(),
            finished: false,
        }
    }

    /// Reads an item outside of any transaction.
    pub fn peek_item(&self, id: EntityId) -> Result<Item> {
        self.repository
            .item(id)?
            .map(|record| record.value)
            .ok_or(RuntimeError::NotFound(Missing::Item(id)))
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }
}

pub struct Transaction {
    id: u64,
    repository: Arc<dyn Repository>,
    changes: ChangeSet,
    callbacks: Vec<CommitCallback>,
    finished: bool,
}

impl Transaction {
    pub fn id(&self) -> u64 {
        self.id
    }

    fn observe<T>(&mut self, key: RecordKey, record: Option<Versioned<T>>) -> Option<T> {
        let version = record.as_ref().map_or(0, |r| r.version);
        self.changes.expected.entry(key).or_insert(version);
        record.map(|r| r.value)
    }

    pub fn load_item(&mut self, id: EntityId) -> Result<Item> {
        if self.changes.deleted_items.contains(&id) {
            return Err(RuntimeError::NotFound(Missing::Item(id)));
        }
        if let Some(staged) = self.changes.items.get(&id) {
            return Ok(staged.clone());
        }
        let record = self.repository.item(id)?;
        self.observe(RecordKey::Item(id), record)
            .ok_or(RuntimeError::NotFound(Missing::Item(id)))
    }

    /// Loads a container and the items `character` may see in it.
    ///
    /// Fails with `NotFound` for an unknown container and `AccessDenied`
    /// when the character has no access to it.
    pub fn load_container(&mut self, id: EntityId, character: EntityId) -> Result<Container> {
        let record = self.repository.container(id)?;
        let info = self
            .observe(RecordKey::Container(id), record)
            .ok_or(RuntimeError::NotFound(Missing::Container(id)))?;

        if !info.accessible_by(character) {
            return Err(RuntimeError::AccessDenied {
                entity: id,
                reason: "container belongs to another character",
            });
        }

        let mut items = Vec::new();
        for record in self.repository.items_in(id)? {
            let item_id = record.value.id;
            if !info.item_visible_to(&record.value, character)
                || self.changes.deleted_items.contains(&item_id)
            {
                continue;
            }
            let item = match self.changes.items.get(&item_id) {
                Some(staged) => staged.clone(),
                None => self
                    .observe(RecordKey::Item(item_id), Some(record))
                    .ok_or(RuntimeError::NotFound(Missing::Item(item_id)))?,
            };
            items.push(item);
        }

        Ok(Container::new(info, items))
    }

    pub fn load_character(&mut self, id: EntityId) -> Result<Character> {
        if let Some(staged) = self.changes.characters.get(&id) {
            return Ok(staged.clone());
        }
        let record = self.repository.character(id)?;
        self.observe(RecordKey::Character(id), record)
            .ok_or(RuntimeError::NotFound(Missing::Character(id)))
    }

    pub fn load_account(&mut self, id: AccountId) -> Result<Account> {
        if let Some(staged) = self.changes.accounts.get(&id) {
            return Ok(staged.clone());
        }
        let record = self.repository.account(id)?;
        self.observe(RecordKey::Account(id), record)
            .ok_or(RuntimeError::NotFound(Missing::Account(id)))
    }

    pub fn load_robot(&mut self, id: EntityId) -> Result<Robot> {
        if let Some(staged) = self.changes.robots.get(&id) {
            return Ok(staged.clone());
        }
        let record = self.repository.robot(id)?;
        self.observe(RecordKey::Robot(id), record)
            .ok_or(RuntimeError::NotFound(Missing::Robot(id)))
    }

    pub fn fresh_id(&self) -> EntityId {
        self.repository.allocate_id()
    }

    /// Instantiates `definition` under a freshly allocated id.
    ///
    /// The item is not staged until it is saved as part of a container.
    pub fn create_item(
        &self,
        definition: &ItemDefinition,
        owner: EntityId,
        quantity: u32,
    ) -> Item {
        Item::new(self.fresh_id(), definition, owner, quantity)
    }

    pub fn delete_item(&mut self, item: &Item) {
        self.changes.items.remove(&item.id);
        self.changes.deleted_items.insert(item.id);
    }

    /// Stages the container record and every item it holds.
    pub fn save_container(&mut self, container: &Container) {
        self.changes
            .containers
            .insert(container.id(), container.info.clone());
        for item in container.items() {
            self.changes.deleted_items.remove(&item.id);
            self.changes.items.insert(item.id, item.clone());
        }
    }

    pub fn update_character(&mut self, character: &Character) {
        self.changes
            .characters
            .insert(character.id, character.clone());
    }

    pub fn update_account(&mut self, account: &Account) {
        self.changes.accounts.insert(account.id, account.clone());
    }

    pub fn update_robot(&mut self, robot: &Robot) {
        self.changes.robots.insert(robot.id, robot.clone());
    }

    pub fn log(&mut self, event: TransactionLogEvent) {
        self.changes.history.push(event);
    }

    /// Registers work to run once the transaction has committed.
    ///
    /// Callbacks run in registration order. A failing callback is logged and
    /// does not affect the committed data or the callbacks after it.
    pub fn on_committed(&mut self, callback: impl FnOnce() -> Result<()> + Send + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        let changes = std::mem::take(&mut self.changes);
        let callbacks = std::mem::take(&mut self.callbacks);

        if let Err(err) = self.repository.commit(changes) {
            warn!(target: "runtime::tx", tx = self.id, error = %err, "commit failed, rolled back");
            return Err(err.into());
        }
        debug!(target: "runtime::tx", tx = self.id, callbacks = callbacks.len(), "committed");

        for (index, callback) in callbacks.into_iter().enumerate() {
            if let Err(err) = callback() {
                warn!(
                    target: "runtime::tx",
                    tx = self.id,
                    index,
                    error = %err,
                    "post-commit callback failed"
                );
            }
        }

        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                target: "runtime::tx",
                tx = self.id,
                discarded_callbacks = self.callbacks.len(),
                "rolled back"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::repository::InMemoryRepository;
    use game_core::{ContainerInfo, ContainerKind};

    fn seeded() -> (Arc<InMemoryRepository>, Store) {
        let repo = Arc::new(InMemoryRepository::default());
        repo.insert_character(Character::new(EntityId(1), AccountId(1)))
            .unwrap();
        repo.insert_container(ContainerInfo {
            id: EntityId(10),
            kind: ContainerKind::Private,
            owner: EntityId(1),
        })
        .unwrap();
        let store = Store::new(repo.clone());
        (repo, store)
    }

    #[test]
    fn callbacks_run_in_order_after_commit() {
        let (_repo, store) = seeded();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut tx = store.begin();
        for n in 0..3 {
            let order = Arc::clone(&order);
            tx.on_committed(move || {
                order.lock().unwrap().push(n);
                Ok(())
            });
        }
        assert!(order.lock().unwrap().is_empty());
        tx.commit().unwrap();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn failing_callback_does_not_stop_later_ones() {
        let (_repo, store) = seeded();
        let ran = Arc::new(Mutex::new(false));

        let mut tx = store.begin();
        tx.on_committed(|| Err(RuntimeError::CommandChannelClosed));
        let flag = Arc::clone(&ran);
        tx.on_committed(move || {
            *flag.lock().unwrap() = true;
            Ok(())
        });

        assert!(tx.commit().is_ok());
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn dropped_transaction_writes_nothing() {
        let (repo, store) = seeded();
        let ran = Arc::new(Mutex::new(false));

        {
            let mut tx = store.begin();
            let mut character = tx.load_character(EntityId(1)).unwrap();
            character.docked = true;
            tx.update_character(&character);
            let flag = Arc::clone(&ran);
            tx.on_committed(move || {
                *flag.lock().unwrap() = true;
                Ok(())
            });
        }

        assert!(!repo.character(EntityId(1)).unwrap().unwrap().value.docked);
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn concurrent_write_is_detected() {
        let (repo, store) = seeded();

        let mut first = store.begin();
        let mut character = first.load_character(EntityId(1)).unwrap();

        let mut other = store.begin();
        let mut theirs = other.load_character(EntityId(1)).unwrap();
        theirs.docked = true;
        other.update_character(&theirs);
        other.commit().unwrap();

        character.in_game = false;
        first.update_character(&character);
        let err = first.commit().unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Repository(crate::repository::RepositoryError::Conflict(_))
        ));
        assert!(repo.character(EntityId(1)).unwrap().unwrap().value.docked);
    }

    #[test]
    fn container_access_is_checked() {
        let (_repo, store) = seeded();
        let mut tx = store.begin();

        let err = tx.load_container(EntityId(10), EntityId(2)).unwrap_err();
        assert!(matches!(err, RuntimeError::AccessDenied { .. }));

        let err = tx.load_container(EntityId(11), EntityId(1)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::NotFound(Missing::Container(EntityId(11)))
        ));
    }
}
