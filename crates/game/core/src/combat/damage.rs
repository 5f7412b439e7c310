//! Area damage descriptors handed to the damage dispatcher.

use crate::state::{EntityId, Position};

/// Damage channel applied by an area attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageKind {
    Chemical,
    Explosive,
    Kinetic,
    Thermal,
    Toxic,
}

/// Complete description of one area-of-effect attack.
///
/// The dispatcher owns the damage formula; this only carries its inputs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageProfile {
    pub attacker: EntityId,
    pub origin: Position,
    pub components: Vec<(DamageKind, f64)>,
    pub optimal_range: f64,
    pub falloff: f64,
    pub explosion_radius: f64,
}

impl DamageProfile {
    pub fn builder(attacker: EntityId) -> DamageProfileBuilder {
        DamageProfileBuilder {
            profile: DamageProfile {
                attacker,
                origin: Position::ORIGIN,
                components: Vec::new(),
                optimal_range: 0.0,
                falloff: 0.0,
                explosion_radius: 0.0,
            },
        }
    }

    pub fn amount(&self, kind: DamageKind) -> f64 {
        self.components
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, amount)| amount)
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.components.iter().map(|(_, amount)| amount).sum()
    }
}

/// Builder for [`DamageProfile`].
#[derive(Clone, Debug)]
pub struct DamageProfileBuilder {
    profile: DamageProfile,
}

impl DamageProfileBuilder {
    #[must_use]
    pub fn at(mut self, origin: Position) -> Self {
        self.profile.origin = origin;
        self
    }

    #[must_use]
    pub fn with_damage(mut self, kind: DamageKind, amount: f64) -> Self {
        self.profile.components.push((kind, amount));
        self
    }

    #[must_use]
    pub fn with_optimal_range(mut self, range: f64) -> Self {
        self.profile.optimal_range = range;
        self
    }

    #[must_use]
    pub fn with_falloff(mut self, falloff: f64) -> Self {
        self.profile.falloff = falloff;
        self
    }

    #[must_use]
    pub fn with_explosion_radius(mut self, radius: f64) -> Self {
        self.profile.explosion_radius = radius;
        self
    }

    pub fn build(self) -> DamageProfile {
        self.profile
    }
}
