//! Outbound zone side effects issued by devices.

use crate::combat::DamageProfile;
use crate::state::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BeamKind {
    PlantBombExplosion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BeamState {
    Hit,
    Miss,
}

/// Local visual effect broadcast to clients within `visibility`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beam {
    pub kind: BeamKind,
    pub position: Position,
    pub state: BeamState,
    pub visibility: f64,
}

/// Sink for effects a device produces while ticking.
///
/// Implementations must not block the tick: they hand the work off and
/// return. A returned error means the hand-off itself failed; the caller
/// records it and moves on.
pub trait ZoneEffects {
    fn create_beam(&self, beam: Beam) -> Result<(), EffectError>;

    fn dispatch_aoe(&self, damage: DamageProfile) -> Result<(), EffectError>;
}

/// Failure to hand an effect off.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("effect channel closed")]
    Closed,

    #[error("effect channel full")]
    Backpressure,

    #[error("{0}")]
    Rejected(String),
}
