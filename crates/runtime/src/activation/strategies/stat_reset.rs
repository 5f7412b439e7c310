use tracing::info;

use game_core::{Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{ActivationStrategy, Followup, Outcome, Requirements};
use crate::api::Result;
use crate::repository::TransactionType;

/// Refunds every spent extension point to the account and forces a relog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatResetStrategy;

impl ActivationStrategy for StatResetStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::StatReset
    }

    fn requirements(&self) -> Requirements {
        Requirements::default().account().docked()
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        if ctx.definition(item.definition)?.effect != ItemEffect::StatReset {
            return Err(ActivationContext::invalid_configuration(item));
        }

        let refunded = ctx.character_mut().reset_extensions();
        let account = ctx.account_mut()?;
        account.extension_points += refunded;
        account.respec_count += 1;

        info!(
            target: "runtime::activation",
            character = %ctx.character().id,
            refunded,
            "extensions reset"
        );
        ctx.log(TransactionType::ItemRedeem, item);

        Ok(Outcome::silent().then(Followup::Relog))
    }
}
