//! Unified error types surfaced by the runtime API.
//!
//! Every failure a request can hit maps to one [`ErrorCategory`], which is
//! what gets reported back to the client. The concrete variant carries the
//! detail for logs.
use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{
    AccountId, ContainerError, DefinitionId, DeployError, EntityId, ItemError, SessionId,
};

use super::request::Command;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} not found")]
    NotFound(Missing),

    #[error("access to {entity} denied: {reason}")]
    AccessDenied {
        entity: EntityId,
        reason: &'static str,
    },

    #[error("precondition failed: {0}")]
    PreconditionFailed(#[from] Precondition),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to serialize payload")]
    Serialization(#[from] serde_json::Error),

    #[error("zone worker command channel closed")]
    CommandChannelClosed,

    #[error("zone worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("zone worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Client-facing classification of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::AccessDenied { .. } => ErrorCategory::AccessDenied,
            Self::PreconditionFailed(_) | Self::Deploy(_) => ErrorCategory::PreconditionFailed,
            Self::Repository(RepositoryError::Conflict(_)) => ErrorCategory::Conflict,
            Self::Item(_)
            | Self::Repository(_)
            | Self::Serialization(_)
            | Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_) => ErrorCategory::Internal,
        }
    }

    /// The precondition that failed, if this is a precondition error.
    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            Self::PreconditionFailed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<ContainerError> for RuntimeError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::ItemNotInContainer { item, .. } => Self::AccessDenied {
                entity: item,
                reason: "item is not in the container",
            },
            ContainerError::Item(err) => Self::Item(err),
        }
    }
}

/// Error classes reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum ErrorCategory {
    NotFound,
    AccessDenied,
    PreconditionFailed,
    Conflict,
    Internal,
}

/// A record that a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Item(EntityId),
    Container(EntityId),
    Character(EntityId),
    Robot(EntityId),
    Account(AccountId),
    Definition(DefinitionId),
    Session(SessionId),
    Handler(Command),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Item(id) => write!(f, "item {id}"),
            Missing::Container(id) => write!(f, "container {id}"),
            Missing::Character(id) => write!(f, "character {id}"),
            Missing::Robot(id) => write!(f, "robot {id}"),
            Missing::Account(id) => write!(f, "account {id}"),
            Missing::Definition(id) => write!(f, "item definition {id}"),
            Missing::Session(id) => write!(f, "session {id}"),
            Missing::Handler(command) => write!(f, "handler for {command}"),
        }
    }
}

/// Named reasons an operation was refused before it changed anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("CharacterHasToBeDocked")]
    CharacterHasToBeDocked,

    #[error("ContainerHasToBeOnADockingBase")]
    ContainerHasToBeOnADockingBase,

    #[error("RobotMustBeSelected")]
    RobotMustBeSelected,

    #[error("NoCharacterSelected")]
    NoCharacterSelected,

    #[error("InvalidItemConfiguration: definition {0}")]
    InvalidItemConfiguration(DefinitionId),

    #[error("MissingArgument: {0}")]
    MissingArgument(&'static str),

    #[error("InvalidArgument: {0}")]
    InvalidArgument(&'static str),
}
