//! Per-tick lifecycle of hazard devices.

use std::time::Duration;

use super::device::{DeathCause, DeviceState, HazardDevice};
use super::effects::{EffectError, ZoneEffects};
use super::policy::{ConfiguredDespawn, DespawnPolicy, DetectionPolicy, DetonationPolicy, ExplosiveDetonation};
use super::scanner::ProximityScanner;
use super::unit::ZoneView;
use crate::state::EntityId;

/// What a single tick did to a device.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// The probe interval elapsed this tick.
    pub probed: bool,
    /// Units noticed by the scan, in scan order.
    pub detected: Vec<EntityId>,
    /// Target of a detonation performed this tick.
    pub detonated: Option<EntityId>,
    /// The despawn countdown was started this tick.
    pub despawn_started: bool,
    /// The despawn countdown ran out this tick.
    pub despawned: bool,
    /// Effects that could not be handed off.
    pub effect_failures: Vec<EffectError>,
}

impl TickReport {
    /// Device reached `Dead` during this tick.
    pub fn died(&self) -> bool {
        self.detonated.is_some() || self.despawned
    }
}

/// Drives a device through arm → detect → detonate, plus its despawn clock.
///
/// The controller is stateless; all per-device state lives in
/// [`HazardDevice`], so one controller serves every device of a kind.
pub struct HazardDeviceController {
    detection: Box<dyn DetectionPolicy>,
    detonation: Box<dyn DetonationPolicy>,
    despawn: Box<dyn DespawnPolicy>,
}

impl HazardDeviceController {
    pub fn new(
        detection: impl DetectionPolicy + 'static,
        detonation: impl DetonationPolicy + 'static,
        despawn: impl DespawnPolicy + 'static,
    ) -> Self {
        Self {
            detection: Box::new(detection),
            detonation: Box::new(detonation),
            despawn: Box::new(despawn),
        }
    }

    /// Land mine: proximity scan, explosive detonation, configured lifetime.
    pub fn landmine() -> Self {
        Self::new(ProximityScanner, ExplosiveDetonation, ConfiguredDespawn)
    }

    /// Advances `device` by `time`.
    ///
    /// Nothing happens until the probe interval elapses. On an elapsed
    /// interval an active device scans and detonates on the first noticed
    /// unit; independently, the despawn countdown is started if absent and
    /// advanced by `time`. Dead devices are left untouched.
    pub fn tick(
        &self,
        device: &mut HazardDevice,
        time: Duration,
        zone: &dyn ZoneView,
        effects: &dyn ZoneEffects,
    ) -> TickReport {
        let mut report = TickReport::default();

        if device.is_dead() || !device.advance_probe(time) {
            return report;
        }
        report.probed = true;

        if device.active {
            report.detected = self.detection.scan(device, zone);

            if let Some(&target) = report.detected.first() {
                device.set_state(DeviceState::Detonating);
                report.effect_failures = self.detonation.detonate(device, target, effects);
                device.set_state(DeviceState::Dead(DeathCause::Detonated { target }));
                report.detonated = Some(target);
            }
        }

        report.despawn_started = device.ensure_despawn(|d| self.despawn.lifetime(d));

        if device.advance_despawn(time) && !device.is_dead() {
            device.set_state(DeviceState::Dead(DeathCause::Despawned));
            report.despawned = true;
        }

        report
    }
}

impl Default for HazardDeviceController {
    fn default() -> Self {
        Self::landmine()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::combat::DamageProfile;
    use crate::config::DeviceTuning;
    use crate::state::Position;
    use crate::zone::effects::Beam;
    use crate::zone::unit::{UnitKind, UnitRegistry, ZoneUnit};

    const TICK: Duration = Duration::from_secs(2);

    #[derive(Default)]
    struct RecordingEffects {
        beams: RefCell<Vec<Beam>>,
        damage: RefCell<Vec<DamageProfile>>,
        fail: bool,
    }

    impl ZoneEffects for RecordingEffects {
        fn create_beam(&self, beam: Beam) -> Result<(), EffectError> {
            if self.fail {
                return Err(EffectError::Closed);
            }
            self.beams.borrow_mut().push(beam);
            Ok(())
        }

        fn dispatch_aoe(&self, damage: DamageProfile) -> Result<(), EffectError> {
            if self.fail {
                return Err(EffectError::Closed);
            }
            self.damage.borrow_mut().push(damage);
            Ok(())
        }
    }

    fn tuning(despawn_ms: u64) -> DeviceTuning {
        DeviceTuning {
            despawn_time_ms: Some(despawn_ms),
            ..DeviceTuning::default()
        }
    }

    fn device(despawn_ms: u64) -> HazardDevice {
        HazardDevice::new(EntityId(1), Position::ORIGIN, tuning(despawn_ms))
    }

    fn zone_with_player(at: Position) -> UnitRegistry {
        [ZoneUnit::new(EntityId(50), UnitKind::Player { mobile: true }, at)]
            .into_iter()
            .collect()
    }

    #[test]
    fn does_nothing_before_probe_interval() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone = zone_with_player(Position::new(1.0, 0.0, 0.0));
        let effects = RecordingEffects::default();

        let report = controller.tick(&mut device, Duration::from_millis(500), &zone, &effects);

        assert!(!report.probed);
        assert!(device.despawn_timer().is_none());
        assert_eq!(device.state(), DeviceState::Armed);
    }

    #[test]
    fn despawn_countdown_is_established_once_then_advanced() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone = UnitRegistry::new();
        let effects = RecordingEffects::default();

        let first = controller.tick(&mut device, TICK, &zone, &effects);
        assert!(first.despawn_started);
        let timer = *device.despawn_timer().unwrap();
        assert_eq!(timer.lifetime(), Duration::from_secs(60));
        assert_eq!(timer.elapsed(), TICK);

        // a changed configuration must not be picked up again
        device.tuning.despawn_time_ms = Some(1);
        let second = controller.tick(&mut device, TICK, &zone, &effects);
        assert!(!second.despawn_started);
        let timer = *device.despawn_timer().unwrap();
        assert_eq!(timer.lifetime(), Duration::from_secs(60));
        assert_eq!(timer.elapsed(), TICK * 2);
    }

    #[test]
    fn detonates_once_on_detected_target() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone = zone_with_player(Position::new(2.0, 2.0, 0.0));
        let effects = RecordingEffects::default();

        let report = controller.tick(&mut device, TICK, &zone, &effects);

        assert_eq!(report.detonated, Some(EntityId(50)));
        assert_eq!(effects.damage.borrow().len(), 1);
        assert_eq!(effects.beams.borrow().len(), 1);
        assert_eq!(
            device.state(),
            DeviceState::Dead(DeathCause::Detonated {
                target: EntityId(50)
            })
        );

        let after = controller.tick(&mut device, TICK, &zone, &effects);
        assert_eq!(after, TickReport::default());
        assert_eq!(effects.damage.borrow().len(), 1);
        assert_eq!(effects.beams.borrow().len(), 1);
    }

    #[test]
    fn picks_first_target_in_scan_order() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone: UnitRegistry = [
            ZoneUnit::new(EntityId(60), UnitKind::Player { mobile: true }, Position::new(4.0, 0.0, 0.0)),
            ZoneUnit::new(EntityId(61), UnitKind::Player { mobile: true }, Position::new(1.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let effects = RecordingEffects::default();

        let report = controller.tick(&mut device, TICK, &zone, &effects);

        assert_eq!(report.detected, vec![EntityId(60), EntityId(61)]);
        assert_eq!(report.detonated, Some(EntityId(60)));
        assert_eq!(effects.damage.borrow().len(), 1);
    }

    #[test]
    fn inactive_device_never_scans_but_still_despawns() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(3_000).inactive();
        let zone = zone_with_player(Position::new(1.0, 0.0, 0.0));
        let effects = RecordingEffects::default();

        let first = controller.tick(&mut device, TICK, &zone, &effects);
        assert!(first.detected.is_empty());
        assert!(!first.died());

        let second = controller.tick(&mut device, TICK, &zone, &effects);
        assert!(second.despawned);
        assert_eq!(device.state(), DeviceState::Dead(DeathCause::Despawned));
        assert!(effects.damage.borrow().is_empty());
    }

    #[test]
    fn failed_effects_do_not_block_death() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone = zone_with_player(Position::new(1.0, 0.0, 0.0));
        let effects = RecordingEffects {
            fail: true,
            ..RecordingEffects::default()
        };

        let report = controller.tick(&mut device, TICK, &zone, &effects);

        assert_eq!(report.effect_failures.len(), 2);
        assert!(device.is_dead());
    }

    #[test]
    fn target_out_of_range_keeps_device_armed() {
        let controller = HazardDeviceController::landmine();
        let mut device = device(60_000);
        let zone = zone_with_player(Position::new(40.0, 0.0, 0.0));
        let effects = RecordingEffects::default();

        let report = controller.tick(&mut device, TICK, &zone, &effects);

        assert!(report.probed);
        assert!(report.detonated.is_none());
        assert_eq!(device.state(), DeviceState::Armed);
    }
}
