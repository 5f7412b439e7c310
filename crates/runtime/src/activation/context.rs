use rand::Rng;

use game_core::{
    Account, Character, Container, DefinitionId, Item, ItemCatalog, ItemDefinition,
};

use crate::api::{Missing, Precondition, Result, RuntimeError};
use crate::repository::{TransactionLogEvent, TransactionType};
use crate::session::Session;
use crate::transaction::Transaction;

/// Everything a strategy may read or change during one activation.
///
/// The character and account are working copies; the dispatcher writes them
/// back through the transaction once the strategy returns.
pub struct ActivationContext<'a> {
    pub tx: &'a mut Transaction,
    pub container: &'a mut Container,
    pub session: &'a Session,
    catalog: &'a ItemCatalog,
    character: &'a mut Character,
    account: Option<&'a mut Account>,
    character_changed: bool,
    now_ms: u64,
}

impl<'a> ActivationContext<'a> {
    pub(crate) fn new(
        tx: &'a mut Transaction,
        catalog: &'a ItemCatalog,
        container: &'a mut Container,
        session: &'a Session,
        character: &'a mut Character,
        account: Option<&'a mut Account>,
        now_ms: u64,
    ) -> Self {
        Self {
            tx,
            container,
            session,
            catalog,
            character,
            account,
            character_changed: false,
            now_ms,
        }
    }

    pub fn definition(&self, id: DefinitionId) -> Result<&'a ItemDefinition> {
        self.catalog
            .get(id)
            .ok_or(RuntimeError::NotFound(Missing::Definition(id)))
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    /// Mutable access marks the character for write-back.
    pub fn character_mut(&mut self) -> &mut Character {
        self.character_changed = true;
        &mut *self.character
    }

    pub(crate) fn character_changed(&self) -> bool {
        self.character_changed
    }

    /// The session's account; only present when the strategy asked for it.
    pub fn account_mut(&mut self) -> Result<&mut Account> {
        let id = self.session.account;
        self.account
            .as_deref_mut()
            .ok_or(RuntimeError::NotFound(Missing::Account(id)))
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Uniform roll in `0..bound`; `bound` must be non-zero.
    pub fn roll(&self, bound: u64) -> u64 {
        rand::thread_rng().gen_range(0..bound)
    }

    /// Creates one unit of `definition` owned by the character and stores it.
    ///
    /// Returns a snapshot of the instance now holding the unit: the existing
    /// stack when it merged, otherwise the new item.
    pub fn create_in_container(
        &mut self,
        definition: &ItemDefinition,
        allow_stacking: bool,
    ) -> Item {
        let mut item = self.tx.create_item(definition, self.character.id, 1);
        item.parent = Some(self.container.id());
        let stored = self.container.add_item(item.clone(), allow_stacking);
        self.container.item(stored).cloned().unwrap_or(item)
    }

    /// Appends a history record about `item` to the transaction.
    pub fn log(&mut self, kind: TransactionType, item: &Item) {
        let event = TransactionLogEvent::new(kind, self.character.id, self.container.id(), item);
        self.tx.log(event);
    }

    pub fn invalid_configuration(item: &Item) -> RuntimeError {
        Precondition::InvalidItemConfiguration(item.definition).into()
    }
}
