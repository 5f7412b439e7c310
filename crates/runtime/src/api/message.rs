//! Outbound messages and the sinks that deliver them.

use tokio::sync::broadcast;
use tracing::trace;

use game_core::{EntityId, SessionId};

use super::errors::Result;
use super::request::{Command, Payload, Request};

/// Who a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Session(SessionId),
    /// Whatever session currently plays the character.
    Character(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub command: Command,
    pub recipient: Recipient,
    pub data: Payload,
}

impl Message {
    /// Result message for `request`, addressed to the requesting session.
    pub fn reply(request: &Request, data: Payload) -> Self {
        Self::to_session(request.command, request.session, data)
    }

    pub fn to_session(command: Command, session: SessionId, data: Payload) -> Self {
        Self {
            command,
            recipient: Recipient::Session(session),
            data,
        }
    }

    pub fn to_character(command: Command, character: EntityId, data: Payload) -> Self {
        Self {
            command,
            recipient: Recipient::Character(character),
            data,
        }
    }
}

/// Delivery channel for outbound messages.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: Message) -> Result<()>;
}

/// Fan-out sink backed by a tokio broadcast channel.
///
/// Transport adapters subscribe and forward messages to their connections.
#[derive(Clone)]
pub struct BroadcastMessageSink {
    tx: broadcast::Sender<Message>,
}

impl BroadcastMessageSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.tx.subscribe()
    }
}

impl MessageSink for BroadcastMessageSink {
    fn send(&self, message: Message) -> Result<()> {
        if self.tx.send(message).is_err() {
            trace!(target: "runtime::message", "no subscribers for outbound message");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_sent_messages() {
        let sink = BroadcastMessageSink::new(4);
        let mut rx = sink.subscribe();

        let request = Request::new(Command::UseRedeemableItem, SessionId(3));
        sink.send(Message::reply(&request, Payload::new())).unwrap();

        let message = rx.recv().await.unwrap();
        assert_eq!(message.recipient, Recipient::Session(SessionId(3)));
        assert_eq!(message.command, Command::UseRedeemableItem);
    }

    #[test]
    fn sending_without_subscribers_is_not_an_error() {
        let sink = BroadcastMessageSink::new(4);
        let message = Message::to_character(Command::ServerMessage, EntityId(1), Payload::new());
        assert!(sink.send(message).is_ok());
    }
}
