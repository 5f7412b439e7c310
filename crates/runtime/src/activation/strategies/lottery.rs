use game_core::{Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{ActivationStrategy, Outcome};
use crate::api::Result;
use crate::repository::TransactionType;

/// Opens into one reward drawn from the definition's weighted table.
///
/// The reward stacks onto a matching stack in the same container.
#[derive(Debug, Clone, Copy, Default)]
pub struct LotteryStrategy;

impl ActivationStrategy for LotteryStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::Lottery
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        let ItemEffect::Lottery(table) = &ctx.definition(item.definition)?.effect else {
            return Err(ActivationContext::invalid_configuration(item));
        };

        let total = table.total_weight();
        let reward_id = (total > 0)
            .then(|| table.pick(ctx.roll(total)))
            .flatten()
            .ok_or_else(|| ActivationContext::invalid_configuration(item))?;
        let reward_definition = ctx.definition(reward_id)?;

        let reward = ctx.create_in_container(reward_definition, true);

        ctx.log(TransactionType::LotteryOpen, item);
        // history records the single drawn unit, not the stack it joined
        let drawn = Item {
            quantity: 1,
            ..reward.clone()
        };
        ctx.log(TransactionType::LotteryRandomItemCreated, &drawn);

        Ok(Outcome::created(reward))
    }
}
