//! Zone tuning parameters for hazard devices and their placement.
use std::time::Duration;

/// Zone-level configuration.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoneConfig {
    pub deployment: DeploymentRules,
    pub device: DeviceTuning,
}

/// How a distance exactly equal to a radius is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryRule {
    /// `distance <= radius` is inside.
    #[default]
    Inclusive,
    /// Only `distance < radius` is inside.
    Exclusive,
}

impl BoundaryRule {
    pub fn within(self, distance: f64, radius: f64) -> bool {
        match self {
            Self::Inclusive => distance <= radius,
            Self::Exclusive => distance < radius,
        }
    }
}

/// Minimum separations enforced before a proximity device is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeploymentRules {
    pub range_from_base: f64,
    pub range_from_teleport: f64,
    pub range_from_device: f64,
    pub boundary: BoundaryRule,
}

impl DeploymentRules {
    pub const DEFAULT_RANGE_FROM_BASE: f64 = 200.0;
    pub const DEFAULT_RANGE_FROM_TELEPORT: f64 = 100.0;
    pub const DEFAULT_RANGE_FROM_DEVICE: f64 = 25.0;
}

impl Default for DeploymentRules {
    fn default() -> Self {
        Self {
            range_from_base: Self::DEFAULT_RANGE_FROM_BASE,
            range_from_teleport: Self::DEFAULT_RANGE_FROM_TELEPORT,
            range_from_device: Self::DEFAULT_RANGE_FROM_DEVICE,
            boundary: BoundaryRule::default(),
        }
    }
}

/// Per-device tuning. Unset optional values fall back to the defaults below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceTuning {
    pub probe_interval_ms: u64,
    pub beam_visibility: f64,
    pub damage_chemical: Option<f64>,
    pub damage_explosive: Option<f64>,
    pub damage_kinetic: Option<f64>,
    pub damage_thermal: Option<f64>,
    pub damage_toxic: Option<f64>,
    /// Work range drives both the detection distance and the damage falloff.
    pub work_range: Option<f64>,
    pub explosion_radius: Option<f64>,
    pub despawn_time_ms: Option<u64>,
}

impl DeviceTuning {
    pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_BEAM_VISIBILITY: f64 = 600.0;
    pub const DEFAULT_DAMAGE: f64 = 5_000.0;
    pub const DEFAULT_DETECTION_RANGE: f64 = 5.0;
    pub const DEFAULT_FALLOFF: f64 = 30.0;
    pub const DEFAULT_EXPLOSION_RADIUS: f64 = 50.0;
    pub const OPTIMAL_RANGE: f64 = 2.0;
    pub const DEFAULT_DESPAWN_TIME_MS: u64 = 30 * 60 * 1_000;

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn detection_range(&self) -> f64 {
        self.work_range.unwrap_or(Self::DEFAULT_DETECTION_RANGE)
    }

    pub fn falloff(&self) -> f64 {
        self.work_range.unwrap_or(Self::DEFAULT_FALLOFF)
    }

    pub fn explosion_radius(&self) -> f64 {
        self.explosion_radius
            .unwrap_or(Self::DEFAULT_EXPLOSION_RADIUS)
    }

    pub fn despawn_time(&self) -> Duration {
        Duration::from_millis(
            self.despawn_time_ms
                .unwrap_or(Self::DEFAULT_DESPAWN_TIME_MS),
        )
    }
}

impl Default for DeviceTuning {
    fn default() -> Self {
        Self {
            probe_interval_ms: Self::DEFAULT_PROBE_INTERVAL_MS,
            beam_visibility: Self::DEFAULT_BEAM_VISIBILITY,
            damage_chemical: None,
            damage_explosive: None,
            damage_kinetic: None,
            damage_thermal: None,
            damage_toxic: None,
            work_range: None,
            explosion_radius: None,
            despawn_time_ms: None,
        }
    }
}
