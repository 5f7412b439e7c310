//! Server runtime for item activation and zone hazards.
//!
//! This crate wires repositories, transactions, sessions and background
//! workers around the pure types of `game-core`. Consumers embed [`Runtime`]
//! to route client requests and drive the zone.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes requests, messages and errors
//! - [`activation`] implements redeemable items as per-kind strategies
//! - [`repository`] and [`transaction`] provide versioned, atomic persistence
//! - [`session`] and [`scheduler`] track selections and deferred follow-ups
//! - [`workers`] runs the zone tick loop
pub mod activation;
pub mod api;
pub mod config;
pub mod repository;
pub mod router;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod transaction;
pub mod workers;

pub use activation::{
    Activation, ActivationDispatcher, ActivationResult, ActivationStrategy, StrategyRegistry,
};
pub use api::{
    BroadcastMessageSink, Command, ErrorCategory, Message, MessageSink, Payload, Precondition,
    Recipient, Request, Result, RuntimeError,
};
pub use config::{RelogConfig, RuntimeConfig};
pub use repository::{
    InMemoryRepository, RepositoryError, Repository, TransactionLogEvent, TransactionType,
};
pub use router::{RequestHandler, RequestRouter};
pub use runtime::{Runtime, RuntimeBuilder};
pub use scheduler::FollowupScheduler;
pub use session::{Session, SessionRegistry, SessionToken};
pub use transaction::{Store, Transaction};
pub use workers::{ChannelZoneEffects, DeviceSummary, ZoneEffect, ZoneHandle};
