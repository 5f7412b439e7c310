//! Built-in activation strategies, one per redeemable item kind.
mod boost;
mod lottery;
mod paint;
mod stat_reset;
mod teleport;
mod template;

pub use boost::BoostStrategy;
pub use lottery::LotteryStrategy;
pub use paint::PaintStrategy;
pub use stat_reset::StatResetStrategy;
pub use teleport::TeleportRedeemStrategy;
pub use template::TemplateUnpackStrategy;
