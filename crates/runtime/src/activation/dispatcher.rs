//! Request handler that activates redeemable items.
//!
//! One activation is one transaction: load, check preconditions, take one
//! unit off the stack, run the kind's strategy, write everything back and
//! commit. Result messages and follow-ups are only released after commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use game_core::{Container, EntityId, Item, ItemCatalog, ItemKind, SessionId};

use super::context::ActivationContext;
use super::strategy::{ActivationStrategy, Followup, Reply, StrategyRegistry};
use crate::api::{
    Command, Message, MessageSink, Payload, Precondition, Request, Result, keys,
};
use crate::config::RelogConfig;
use crate::router::{RequestHandler, RequestRouter};
use crate::scheduler::{FollowupScheduler, deselect_character};
use crate::session::{Session, SessionRegistry};
use crate::transaction::{Store, Transaction};

/// Body of a successful activation result message.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationResult {
    pub container: Value,
    pub item: Value,
}

impl ActivationResult {
    /// Snapshots `container` and `item`; a consumed item reports quantity -1.
    pub fn new(container: &Container, item: &Item, consumed: bool) -> Result<Self> {
        let mut item = serde_json::to_value(item)?;
        if consumed && let Value::Object(fields) = &mut item {
            fields.insert(keys::QUANTITY.to_owned(), Value::from(-1));
        }

        Ok(Self {
            container: serde_json::to_value(container)?,
            item,
        })
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert(keys::CONTAINER.to_owned(), self.container.clone());
        payload.insert(keys::ITEM.to_owned(), self.item.clone());
        payload
    }
}

/// How an activation request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// No strategy is registered for the item's kind; nothing changed.
    Ignored { kind: ItemKind },
    /// Committed; the result was sent to the requester.
    Replied(ActivationResult),
    /// Committed without a result message.
    Completed,
}

pub struct ActivationDispatcher {
    store: Store,
    catalog: Arc<ItemCatalog>,
    sessions: Arc<SessionRegistry>,
    messages: Arc<dyn MessageSink>,
    scheduler: FollowupScheduler,
    strategies: StrategyRegistry,
    relog: RelogConfig,
}

impl ActivationDispatcher {
    pub fn new(
        store: Store,
        catalog: Arc<ItemCatalog>,
        sessions: Arc<SessionRegistry>,
        messages: Arc<dyn MessageSink>,
        strategies: StrategyRegistry,
        relog: RelogConfig,
    ) -> Self {
        let scheduler = FollowupScheduler::new(store.clone(), Arc::clone(&sessions));
        Self {
            store,
            catalog,
            sessions,
            messages,
            scheduler,
            strategies,
            relog,
        }
    }

    /// Activates one unit of `item_id` held in `container_id`.
    ///
    /// Items of a kind without a registered strategy are ignored.
    pub async fn activate(
        &self,
        item_id: EntityId,
        container_id: EntityId,
        session_id: SessionId,
        router: &RequestRouter,
    ) -> Result<Activation> {
        let session = self.sessions.require(session_id)?;
        let item = self.store.peek_item(item_id)?;

        let Some(strategy) = self.strategies.get(item.kind) else {
            debug!(
                target: "runtime::activation",
                item = %item_id,
                kind = %item.kind,
                "no strategy for item kind, ignoring"
            );
            return Ok(Activation::Ignored { kind: item.kind });
        };

        let (activation, redispatch) =
            self.execute(strategy.as_ref(), item_id, container_id, &session)?;

        if let Some(request) = redispatch {
            router.handle_local_request(request).await?;
        }

        Ok(activation)
    }

    fn execute(
        &self,
        strategy: &dyn ActivationStrategy,
        item_id: EntityId,
        container_id: EntityId,
        session: &Session,
    ) -> Result<(Activation, Option<Request>)> {
        let character_id = session
            .character
            .ok_or(Precondition::NoCharacterSelected)?;
        let requirements = strategy.requirements();
        let mut tx = self.store.begin();

        let mut account = if requirements.account {
            Some(tx.load_account(session.account)?)
        } else {
            None
        };
        let mut character = tx.load_character(character_id)?;
        if requirements.docked && !character.docked {
            return Err(Precondition::CharacterHasToBeDocked.into());
        }

        let mut container = tx.load_container(container_id, character.id)?;
        if let Some(required) = requirements.container {
            required.check(container.kind())?;
        }

        let consumed = container.unstack(item_id, 1, || tx.fresh_id())?.item;

        let mut ctx = ActivationContext::new(
            &mut tx,
            &self.catalog,
            &mut container,
            session,
            &mut character,
            account.as_mut(),
            now_ms(),
        );
        let outcome = strategy.apply(&mut ctx, &consumed)?;
        let character_changed = ctx.character_changed();

        tx.delete_item(&consumed);
        tx.save_container(&container);
        if character_changed {
            tx.update_character(&character);
        }
        if let Some(account) = &account {
            tx.update_account(account);
        }

        let result = match &outcome.reply {
            Reply::Silent => None,
            Reply::Created(item) => Some(ActivationResult::new(&container, item, false)?),
            Reply::Consumed => Some(ActivationResult::new(&container, &consumed, true)?),
        };
        if let Some(result) = &result {
            let messages = Arc::clone(&self.messages);
            let message = Message::to_session(
                Command::UseRedeemableItem,
                session.id,
                result.to_payload(),
            );
            tx.on_committed(move || messages.send(message));
        }

        let mut redispatch = None;
        match outcome.followup {
            Some(Followup::Relog) => self.register_relog(&mut tx, session, character.id),
            Some(Followup::Redispatch(request)) => redispatch = Some(request),
            None => {}
        }

        let tx_id = tx.id();
        tx.commit()?;
        info!(
            target: "runtime::activation",
            tx = tx_id,
            item = %item_id,
            kind = %consumed.kind,
            character = %character.id,
            "item activated"
        );

        let activation = match result {
            Some(result) => Activation::Replied(result),
            None => Activation::Completed,
        };
        Ok((activation, redispatch))
    }

    /// After commit: tell the character to relog, then deselect it once the
    /// relog delay has passed.
    fn register_relog(&self, tx: &mut Transaction, session: &Session, character: EntityId) {
        let messages = Arc::clone(&self.messages);
        let scheduler = self.scheduler.clone();
        let relog = self.relog.clone();
        let token = session.token();

        tx.on_committed(move || {
            scheduler.schedule_after(relog.delay, token, deselect_character);

            let mut data = Payload::new();
            data.insert(keys::MESSAGE.to_owned(), Value::from(relog.message));
            data.insert(keys::TRANSLATE.to_owned(), Value::from(relog.translation_key));
            messages.send(Message::to_character(Command::ServerMessage, character, data))
        });
    }
}

#[async_trait]
impl RequestHandler for ActivationDispatcher {
    async fn handle(&self, request: Request, router: &RequestRouter) -> Result<()> {
        let item = request.entity_id(keys::ITEM_EID)?;
        let container = request.entity_id(keys::CONTAINER_EID)?;
        self.activate(item, container, request.session, router)
            .await
            .map(|_| ())
    }
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
