//! Zone-resident units as seen by hazard devices and deployment checks.

use crate::state::{EntityId, Position};

/// Coarse classification of a zone unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitKind {
    /// Robot driven by a player. `mobile` is false while it is being
    /// deployed, docked or otherwise anchored.
    Player { mobile: bool },
    Npc,
    DockingBase,
    Teleport,
    /// Any device of the proximity family (mines, probes).
    ProximityDevice,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneUnit {
    pub id: EntityId,
    pub kind: UnitKind,
    pub position: Position,
}

impl ZoneUnit {
    pub const fn new(id: EntityId, kind: UnitKind, position: Position) -> Self {
        Self { id, kind, position }
    }

    pub fn is_mobile_player(&self) -> bool {
        matches!(self.kind, UnitKind::Player { mobile: true })
    }
}

/// Read access to the units of a zone.
///
/// Iteration order is whatever the implementation stores; callers must not
/// rely on it beyond "first match wins".
pub trait ZoneView {
    fn units(&self) -> &[ZoneUnit];

    fn unit(&self, id: EntityId) -> Option<&ZoneUnit> {
        self.units().iter().find(|u| u.id == id)
    }
}

/// Plain insertion-ordered unit list.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    units: Vec<ZoneUnit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a unit.
    pub fn upsert(&mut self, unit: ZoneUnit) {
        match self.units.iter_mut().find(|u| u.id == unit.id) {
            Some(existing) => *existing = unit,
            None => self.units.push(unit),
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<ZoneUnit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn move_to(&mut self, id: EntityId, position: Position) -> bool {
        match self.units.iter_mut().find(|u| u.id == id) {
            Some(unit) => {
                unit.position = position;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl ZoneView for UnitRegistry {
    fn units(&self) -> &[ZoneUnit] {
        &self.units
    }
}

impl FromIterator<ZoneUnit> for UnitRegistry {
    fn from_iter<T: IntoIterator<Item = ZoneUnit>>(iter: T) -> Self {
        let mut registry = Self::new();
        for unit in iter {
            registry.upsert(unit);
        }
        registry
    }
}
