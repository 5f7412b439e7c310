//! Placement validation for proximity devices.

use super::unit::{UnitKind, ZoneUnit, ZoneView};
use crate::config::DeploymentRules;
use crate::state::{EntityId, Position};

/// Reasons a device may not be placed at a position.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum DeployError {
    #[error("docking base {unit} is {distance:.1} away, closer than {radius}")]
    NotDeployableNearObject {
        unit: EntityId,
        distance: f64,
        radius: f64,
    },

    #[error("teleport {unit} is in range ({distance:.1} < {radius})")]
    TeleportIsInRange {
        unit: EntityId,
        distance: f64,
        radius: f64,
    },

    #[error("device {unit} is {distance:.1} away, closer than {radius}")]
    TooCloseToOtherDevice {
        unit: EntityId,
        distance: f64,
        radius: f64,
    },

    #[error("device {unit} is already deployed")]
    AlreadyDeployed { unit: EntityId },
}

impl DeployError {
    /// Stable reason code for client-facing errors.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotDeployableNearObject { .. } => "NotDeployableNearObject",
            Self::TeleportIsInRange { .. } => "TeleportIsInRange",
            Self::TooCloseToOtherDevice { .. } => "TooCloseToOtherDevice",
            Self::AlreadyDeployed { .. } => "AlreadyDeployed",
        }
    }
}

/// Checks a candidate position against every protected structure.
///
/// Separations are measured on the ground plane. Bases are checked first,
/// then teleports, then other proximity devices; the first violation wins.
pub fn check_deployment(
    rules: &DeploymentRules,
    zone: &dyn ZoneView,
    position: Position,
) -> Result<(), DeployError> {
    let first_within = |kind: UnitKind, radius: f64| -> Option<(EntityId, f64)> {
        zone.units()
            .iter()
            .filter(|unit| unit.kind == kind)
            .map(|unit: &ZoneUnit| (unit.id, unit.position.distance_2d(&position)))
            .find(|&(_, distance)| rules.boundary.within(distance, radius))
    };

    if let Some((unit, distance)) = first_within(UnitKind::DockingBase, rules.range_from_base) {
        return Err(DeployError::NotDeployableNearObject {
            unit,
            distance,
            radius: rules.range_from_base,
        });
    }

    if let Some((unit, distance)) = first_within(UnitKind::Teleport, rules.range_from_teleport) {
        return Err(DeployError::TeleportIsInRange {
            unit,
            distance,
            radius: rules.range_from_teleport,
        });
    }

    if let Some((unit, distance)) =
        first_within(UnitKind::ProximityDevice, rules.range_from_device)
    {
        return Err(DeployError::TooCloseToOtherDevice {
            unit,
            distance,
            radius: rules.range_from_device,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryRule;
    use crate::zone::unit::UnitRegistry;

    fn rules(boundary: BoundaryRule) -> DeploymentRules {
        DeploymentRules {
            range_from_base: 100.0,
            range_from_teleport: 50.0,
            range_from_device: 10.0,
            boundary,
        }
    }

    fn zone() -> UnitRegistry {
        [
            ZoneUnit::new(EntityId(1), UnitKind::DockingBase, Position::flat(0.0, 0.0)),
            ZoneUnit::new(EntityId(2), UnitKind::Teleport, Position::flat(500.0, 0.0)),
            ZoneUnit::new(EntityId(3), UnitKind::ProximityDevice, Position::flat(0.0, 500.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn rejects_position_near_docking_base() {
        let err = check_deployment(&rules(BoundaryRule::Inclusive), &zone(), Position::flat(30.0, 40.0))
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::NotDeployableNearObject { unit: EntityId(1), .. }
        ));
        assert_eq!(err.code(), "NotDeployableNearObject");
    }

    #[test]
    fn base_boundary_is_inclusive_by_default() {
        let at_boundary = Position::flat(60.0, 80.0); // exactly 100 from the base

        let inclusive = check_deployment(&rules(BoundaryRule::Inclusive), &zone(), at_boundary);
        assert!(matches!(
            inclusive,
            Err(DeployError::NotDeployableNearObject { .. })
        ));

        let exclusive = check_deployment(&rules(BoundaryRule::Exclusive), &zone(), at_boundary);
        assert_eq!(exclusive, Ok(()));
    }

    #[test]
    fn rejects_position_near_teleport() {
        let err = check_deployment(&rules(BoundaryRule::Inclusive), &zone(), Position::flat(470.0, 0.0))
            .unwrap_err();
        assert_eq!(err.code(), "TeleportIsInRange");
    }

    #[test]
    fn rejects_position_near_other_device() {
        let err = check_deployment(&rules(BoundaryRule::Inclusive), &zone(), Position::flat(3.0, 495.0))
            .unwrap_err();
        assert_eq!(err.code(), "TooCloseToOtherDevice");
    }

    #[test]
    fn altitude_is_ignored_for_separation() {
        let high_above_base = Position::new(10.0, 0.0, 900.0);
        assert!(check_deployment(&rules(BoundaryRule::Inclusive), &zone(), high_above_base).is_err());
    }

    #[test]
    fn accepts_open_ground() {
        assert_eq!(
            check_deployment(&rules(BoundaryRule::Inclusive), &zone(), Position::flat(300.0, 300.0)),
            Ok(())
        );
    }
}
