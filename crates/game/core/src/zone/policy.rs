//! Pluggable behaviors a hazard device is assembled from.
//!
//! A device kind is a combination of one detection, one detonation and one
//! despawn policy. [`HazardDeviceController`](super::HazardDeviceController)
//! drives them; the policies never touch the device lifecycle themselves.

use std::time::Duration;

use super::device::HazardDevice;
use super::effects::{Beam, BeamKind, BeamState, EffectError, ZoneEffects};
use super::unit::ZoneView;
use crate::combat::{DamageKind, DamageProfile};
use crate::config::DeviceTuning;
use crate::state::EntityId;

/// Decides which units a device currently notices.
pub trait DetectionPolicy: Send + Sync {
    /// Returns noticed units in scan order; empty when nothing is near.
    fn scan(&self, device: &HazardDevice, zone: &dyn ZoneView) -> Vec<EntityId>;
}

/// Produces the effects of a device going off.
pub trait DetonationPolicy: Send + Sync {
    /// Issues effects for a detonation against `target`.
    ///
    /// Every effect is attempted; failures are returned, not propagated.
    fn detonate(
        &self,
        device: &HazardDevice,
        target: EntityId,
        effects: &dyn ZoneEffects,
    ) -> Vec<EffectError>;
}

/// Decides how long a device stays in the zone.
pub trait DespawnPolicy: Send + Sync {
    fn lifetime(&self, device: &HazardDevice) -> Duration;
}

/// Explosion beam plus a five-channel area attack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplosiveDetonation;

impl ExplosiveDetonation {
    pub fn beam(device: &HazardDevice) -> Beam {
        Beam {
            kind: BeamKind::PlantBombExplosion,
            position: device.position,
            state: BeamState::Hit,
            visibility: device.tuning.beam_visibility,
        }
    }

    pub fn damage(device: &HazardDevice) -> DamageProfile {
        let tuning = &device.tuning;
        let amount = |configured: Option<f64>| configured.unwrap_or(DeviceTuning::DEFAULT_DAMAGE);

        DamageProfile::builder(device.id)
            .at(device.position)
            .with_damage(DamageKind::Chemical, amount(tuning.damage_chemical))
            .with_damage(DamageKind::Explosive, amount(tuning.damage_explosive))
            .with_damage(DamageKind::Kinetic, amount(tuning.damage_kinetic))
            .with_damage(DamageKind::Thermal, amount(tuning.damage_thermal))
            .with_damage(DamageKind::Toxic, amount(tuning.damage_toxic))
            .with_optimal_range(DeviceTuning::OPTIMAL_RANGE)
            .with_falloff(tuning.falloff())
            .with_explosion_radius(tuning.explosion_radius())
            .build()
    }
}

impl DetonationPolicy for ExplosiveDetonation {
    fn detonate(
        &self,
        device: &HazardDevice,
        _target: EntityId,
        effects: &dyn ZoneEffects,
    ) -> Vec<EffectError> {
        [
            effects.create_beam(Self::beam(device)),
            effects.dispatch_aoe(Self::damage(device)),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }
}

/// Lifetime read from the device's `despawn_time_ms` tuning.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfiguredDespawn;

impl DespawnPolicy for ConfiguredDespawn {
    fn lifetime(&self, device: &HazardDevice) -> Duration {
        device.tuning.despawn_time()
    }
}
