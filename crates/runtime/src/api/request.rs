//! Inbound requests and the commands that name them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use game_core::{EntityId, SessionId};

use super::errors::{Precondition, Result};

/// Key/value body of a request or message.
pub type Payload = serde_json::Map<String, Value>;

/// Well-known payload keys.
pub mod keys {
    pub const ITEM_EID: &str = "itemEID";
    pub const CONTAINER_EID: &str = "containerEID";
    pub const CONTAINER: &str = "container";
    pub const ITEM: &str = "item";
    pub const QUANTITY: &str = "quantity";
    pub const MESSAGE: &str = "message";
    pub const TRANSLATE: &str = "translate";
    pub const ID: &str = "ID";
}

/// Command names understood by the request router.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum Command {
    /// Activate a redeemable item from a container.
    UseRedeemableItem,
    /// Teleport to a docking base by id.
    SparkTeleportUse,
    /// Free-form server notification to a character.
    ServerMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub command: Command,
    pub session: SessionId,
    pub data: Payload,
}

impl Request {
    pub fn new(command: Command, session: SessionId) -> Self {
        Self {
            command,
            session,
            data: Payload::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_owned(), value.into());
        self
    }

    /// Builds an item activation request.
    pub fn use_item(session: SessionId, item: EntityId, container: EntityId) -> Self {
        Self::new(Command::UseRedeemableItem, session)
            .with(keys::ITEM_EID, item.0)
            .with(keys::CONTAINER_EID, container.0)
    }

    /// Reads a required entity id argument.
    pub fn entity_id(&self, key: &'static str) -> Result<EntityId> {
        let value = self
            .data
            .get(key)
            .ok_or(Precondition::MissingArgument(key))?;
        let raw = value.as_u64().ok_or(Precondition::InvalidArgument(key))?;
        Ok(EntityId(raw))
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.data.get(key).and_then(Value::as_u64)
    }
}
