//! Audit records written alongside item activations.

use chrono::{DateTime, Utc};

use game_core::{DefinitionId, EntityId, Item};

/// Kind of an item history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum TransactionType {
    LotteryOpen,
    LotteryRandomItemCreated,
    ItemRedeem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLogEvent {
    pub kind: TransactionType,
    pub character: EntityId,
    pub container: EntityId,
    pub item: EntityId,
    pub definition: DefinitionId,
    pub quantity: u32,
    pub recorded_at: DateTime<Utc>,
}

impl TransactionLogEvent {
    pub fn new(kind: TransactionType, character: EntityId, container: EntityId, item: &Item) -> Self {
        Self {
            kind,
            character,
            container,
            item: item.id,
            definition: item.definition,
            quantity: item.quantity,
            recorded_at: Utc::now(),
        }
    }
}
