use game_core::{Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{
    ActivationStrategy, ContainerRequirement, Outcome, Requirements,
};
use crate::api::Result;

/// Unpacks into a standalone item built from the referenced definition.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateUnpackStrategy;

impl ActivationStrategy for TemplateUnpackStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::TemplateUnpack
    }

    fn requirements(&self) -> Requirements {
        Requirements::default()
            .docked()
            .container(ContainerRequirement::Public)
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        let ItemEffect::TemplateUnpack { produces } = ctx.definition(item.definition)?.effect
        else {
            return Err(ActivationContext::invalid_configuration(item));
        };

        let definition = ctx.definition(produces)?;
        let created = ctx.create_in_container(definition, false);

        Ok(Outcome::created(created))
    }
}
