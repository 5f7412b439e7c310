//! Item activation: one dispatcher, one strategy per redeemable kind.
//!
//! The [`ActivationDispatcher`] owns the shared workflow (session and
//! precondition checks, unstacking, write-back, result delivery). What an
//! item actually does lives in an [`ActivationStrategy`] looked up by
//! [`ItemKind`](game_core::ItemKind) in a [`StrategyRegistry`].

mod context;
mod dispatcher;
mod strategies;
mod strategy;

pub use context::ActivationContext;
pub use dispatcher::{Activation, ActivationDispatcher, ActivationResult};
pub use strategies::{
    BoostStrategy, LotteryStrategy, PaintStrategy, StatResetStrategy, TeleportRedeemStrategy,
    TemplateUnpackStrategy,
};
pub use strategy::{
    ActivationStrategy, ContainerRequirement, Followup, Outcome, Reply, Requirements,
    StrategyRegistry,
};
