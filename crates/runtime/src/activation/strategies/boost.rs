use game_core::{Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{ActivationStrategy, Outcome, Requirements};
use crate::api::Result;
use crate::repository::TransactionType;

/// Applies a timed bonus to the owning account.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoostStrategy;

impl ActivationStrategy for BoostStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::Boost
    }

    fn requirements(&self) -> Requirements {
        Requirements::default().account()
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        let ItemEffect::Boost(spec) = ctx.definition(item.definition)?.effect else {
            return Err(ActivationContext::invalid_configuration(item));
        };

        let now_ms = ctx.now_ms();
        ctx.account_mut()?.apply_boost(spec, now_ms);
        ctx.log(TransactionType::ItemRedeem, item);

        Ok(Outcome::consumed())
    }
}
