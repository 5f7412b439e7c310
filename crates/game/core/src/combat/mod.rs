//! Combat descriptors consumed by external damage resolution.
mod damage;

pub use damage::{DamageKind, DamageProfile, DamageProfileBuilder};
