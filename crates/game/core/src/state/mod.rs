//! Identifiers and spatial primitives shared by every other module.
mod ids;
mod position;

pub use ids::{AccountId, DefinitionId, EntityId, SessionId};
pub use position::Position;
