use game_core::{ContainerKind, Item, ItemEffect, ItemKind};

use crate::activation::context::ActivationContext;
use crate::activation::strategy::{
    ActivationStrategy, ContainerRequirement, Outcome, Requirements,
};
use crate::api::{Precondition, Result};

/// Tints the robot whose inventory holds the paint.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaintStrategy;

impl ActivationStrategy for PaintStrategy {
    fn kind(&self) -> ItemKind {
        ItemKind::Paint
    }

    fn requirements(&self) -> Requirements {
        Requirements::default()
            .docked()
            .container(ContainerRequirement::RobotInventory)
    }

    fn apply(&self, ctx: &mut ActivationContext<'_>, item: &Item) -> Result<Outcome> {
        let ItemEffect::Paint(tint) = ctx.definition(item.definition)?.effect else {
            return Err(ActivationContext::invalid_configuration(item));
        };
        let ContainerKind::RobotInventory { robot } = ctx.container.kind() else {
            return Err(Precondition::RobotMustBeSelected.into());
        };

        let mut robot = ctx.tx.load_robot(robot)?;
        robot.tint = Some(tint);
        ctx.tx.update_robot(&robot);

        Ok(Outcome::consumed())
    }
}
