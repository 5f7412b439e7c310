//! Zone simulation for hazard devices.
//!
//! Everything here is synchronous and single-threaded per zone: the zone's
//! tick loop owns the devices and hands each one to the
//! [`HazardDeviceController`] once per step. Effects leave through
//! [`ZoneEffects`] and are not awaited.
mod controller;
mod deploy;
mod device;
mod effects;
mod policy;
mod scanner;
mod timer;
mod unit;

pub use controller::{HazardDeviceController, TickReport};
pub use deploy::{DeployError, check_deployment};
pub use device::{DeathCause, DeviceState, HazardDevice};
pub use effects::{Beam, BeamKind, BeamState, EffectError, ZoneEffects};
pub use policy::{
    ConfiguredDespawn, DespawnPolicy, DetectionPolicy, DetonationPolicy, ExplosiveDetonation,
};
pub use scanner::ProximityScanner;
pub use timer::{DespawnTimer, IntervalTimer};
pub use unit::{UnitKind, UnitRegistry, ZoneUnit, ZoneView};
