//! Per-kind activation behaviors and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use game_core::{ContainerKind, Item, ItemKind};

use super::context::ActivationContext;
use crate::api::{Precondition, Request, Result};

/// Behavior run when an item of one kind is activated.
///
/// The dispatcher has already loaded everything [`requirements`] asks for,
/// checked the preconditions, and taken one unit out of the container. The
/// strategy applies the payoff through the context and reports what to send
/// back.
///
/// [`requirements`]: ActivationStrategy::requirements
pub trait ActivationStrategy: Send + Sync {
    fn kind(&self) -> ItemKind;

    fn requirements(&self) -> Requirements {
        Requirements::default()
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome>;
}

/// Preconditions checked before a strategy runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Load the session's account into the context.
    pub account: bool,
    /// The character must be docked.
    pub docked: bool,
    pub container: Option<ContainerRequirement>,
}

impl Requirements {
    pub const fn account(mut self) -> Self {
        self.account = true;
        self
    }

    pub const fn docked(mut self) -> Self {
        self.docked = true;
        self
    }

    pub const fn container(mut self, requirement: ContainerRequirement) -> Self {
        self.container = Some(requirement);
        self
    }
}

/// Container kind a strategy insists on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRequirement {
    /// A public container on a docking base.
    Public,
    /// A robot's inventory.
    RobotInventory,
}

impl ContainerRequirement {
    pub fn check(self, kind: ContainerKind) -> Result<()> {
        match (self, kind) {
            (Self::Public, ContainerKind::Public { .. }) => Ok(()),
            (Self::RobotInventory, ContainerKind::RobotInventory { .. }) => Ok(()),
            (Self::Public, _) => Err(Precondition::ContainerHasToBeOnADockingBase.into()),
            (Self::RobotInventory, _) => Err(Precondition::RobotMustBeSelected.into()),
        }
    }
}

/// What the requester gets back.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// No result message.
    Silent,
    /// Result carries the container and the newly created item.
    Created(Item),
    /// Result carries the container and the consumed item with quantity -1.
    Consumed,
}

/// Work that follows a committed activation.
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    /// Notify the character, then deselect it after the relog delay.
    Relog,
    /// Route another request through the same session.
    Redispatch(Request),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reply: Reply,
    pub followup: Option<Followup>,
}

impl Outcome {
    pub fn created(item: Item) -> Self {
        Self {
            reply: Reply::Created(item),
            followup: None,
        }
    }

    pub fn consumed() -> Self {
        Self {
            reply: Reply::Consumed,
            followup: None,
        }
    }

    pub fn silent() -> Self {
        Self {
            reply: Reply::Silent,
            followup: None,
        }
    }

    pub fn then(mut self, followup: Followup) -> Self {
        self.followup = Some(followup);
        self
    }
}

/// Strategies keyed by the item kind they handle.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<ItemKind, Arc<dyn ActivationStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in redeemable kind.
    pub fn standard() -> Self {
        use super::strategies::{
            BoostStrategy, LotteryStrategy, PaintStrategy, StatResetStrategy,
            TemplateUnpackStrategy, TeleportRedeemStrategy,
        };

        let mut registry = Self::new();
        registry
            .register(Arc::new(LotteryStrategy))
            .register(Arc::new(BoostStrategy))
            .register(Arc::new(PaintStrategy))
            .register(Arc::new(TemplateUnpackStrategy))
            .register(Arc::new(StatResetStrategy))
            .register(Arc::new(TeleportRedeemStrategy));
        registry
    }

    /// Registers a strategy under its own kind, replacing any earlier one.
    pub fn register(&mut self, strategy: Arc<dyn ActivationStrategy>) -> &mut Self {
        self.strategies.insert(strategy.kind(), strategy);
        self
    }

    pub fn get(&self, kind: ItemKind) -> Option<&Arc<dyn ActivationStrategy>> {
        self.strategies.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
