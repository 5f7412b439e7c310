use game_core::{Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{ActivationStrategy, Followup, Outcome, Requirements};
use crate::api::{Command, Request, Result, keys};
use crate::repository::TransactionType;

/// Redeems into a teleport request for the definition's destination base.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeleportRedeemStrategy;

impl ActivationStrategy for TeleportRedeemStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::TeleportRedeem
    }

    fn requirements(&self) -> Requirements {
        Requirements::default().account().docked()
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        let ItemEffect::TeleportRedeem { base_id } = ctx.definition(item.definition)?.effect else {
            return Err(ActivationContext::invalid_configuration(item));
        };

        ctx.log(TransactionType::ItemRedeem, item);

        let teleport = Request::new(Command::SparkTeleportUse, ctx.session.id).with(keys::ID, base_id);
        Ok(Outcome::silent().then(Followup::Redispatch(teleport)))
    }
}
