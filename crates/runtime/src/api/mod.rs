//! Types downstream clients and transport adapters interact with.
mod errors;
mod message;
mod request;

pub use errors::{ErrorCategory, Missing, Precondition, Result, RuntimeError};
pub use message::{BroadcastMessageSink, Message, MessageSink, Recipient};
pub use request::{Command, Payload, Request, keys};
