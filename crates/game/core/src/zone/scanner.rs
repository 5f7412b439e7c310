//! Per-tick proximity detection.

use super::device::HazardDevice;
use super::policy::DetectionPolicy;
use super::unit::{ZoneUnit, ZoneView};
use crate::state::EntityId;

/// Detects mobile player units within a 3-D distance of a device.
///
/// The range comes from the device tuning (`work_range`, default 5). Results
/// keep the zone's iteration order and may be empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProximityScanner;

impl ProximityScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, device: &HazardDevice, zone: &dyn ZoneView) -> Vec<EntityId> {
        let range = device.tuning.detection_range();

        zone.units()
            .iter()
            .filter(|unit| unit.id != device.id)
            .filter(|unit| Self::is_detected(device, unit, range))
            .map(|unit| unit.id)
            .collect()
    }

    fn is_detected(device: &HazardDevice, unit: &ZoneUnit, range: f64) -> bool {
        unit.is_mobile_player() && device.position.distance_3d(&unit.position) <= range
    }
}

impl DetectionPolicy for ProximityScanner {
    fn scan(&self, device: &HazardDevice, zone: &dyn ZoneView) -> Vec<EntityId> {
        ProximityScanner::scan(self, device, zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceTuning;
    use crate::state::Position;
    use crate::zone::unit::{UnitKind, UnitRegistry};

    fn device() -> HazardDevice {
        HazardDevice::new(EntityId(1), Position::ORIGIN, DeviceTuning::default())
    }

    #[test]
    fn detects_only_mobile_players_in_range() {
        let zone: UnitRegistry = [
            ZoneUnit::new(EntityId(10), UnitKind::Player { mobile: true }, Position::new(3.0, 0.0, 0.0)),
            ZoneUnit::new(EntityId(11), UnitKind::Player { mobile: false }, Position::new(1.0, 0.0, 0.0)),
            ZoneUnit::new(EntityId(12), UnitKind::Npc, Position::new(1.0, 1.0, 0.0)),
            ZoneUnit::new(EntityId(13), UnitKind::Player { mobile: true }, Position::new(9.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(ProximityScanner.scan(&device(), &zone), vec![EntityId(10)]);
    }

    #[test]
    fn altitude_counts_towards_distance() {
        let zone: UnitRegistry = [ZoneUnit::new(
            EntityId(10),
            UnitKind::Player { mobile: true },
            Position::new(0.0, 0.0, 6.0),
        )]
        .into_iter()
        .collect();

        assert!(ProximityScanner.scan(&device(), &zone).is_empty());
    }

    #[test]
    fn preserves_zone_order() {
        let zone: UnitRegistry = [
            ZoneUnit::new(EntityId(21), UnitKind::Player { mobile: true }, Position::new(4.0, 0.0, 0.0)),
            ZoneUnit::new(EntityId(20), UnitKind::Player { mobile: true }, Position::new(1.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            ProximityScanner.scan(&device(), &zone),
            vec![EntityId(21), EntityId(20)]
        );
    }
}
