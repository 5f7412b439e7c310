//! Placed hazard device state.

use std::time::Duration;

use super::timer::{DespawnTimer, IntervalTimer};
use crate::config::DeviceTuning;
use crate::state::{EntityId, Position};

/// Lifecycle state of a hazard device.
///
/// Despawn progress is tracked separately and is not a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Armed,
    /// Transient: set while the detonation policy runs within a tick.
    Detonating,
    Dead(DeathCause),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    /// Exploded on `target`.
    Detonated { target: EntityId },
    /// Lifetime ran out.
    Despawned,
}

/// A placed proximity device.
#[derive(Clone, Debug)]
pub struct HazardDevice {
    pub id: EntityId,
    pub owner: Option<EntityId>,
    pub position: Position,
    /// Inactive devices still tick (and despawn) but never scan.
    pub active: bool,
    pub tuning: DeviceTuning,
    state: DeviceState,
    probe: IntervalTimer,
    despawn: Option<DespawnTimer>,
}

impl HazardDevice {
    pub fn new(id: EntityId, position: Position, tuning: DeviceTuning) -> Self {
        Self {
            id,
            owner: None,
            position,
            active: true,
            probe: IntervalTimer::new(tuning.probe_interval()),
            tuning,
            state: DeviceState::Armed,
            despawn: None,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, DeviceState::Dead(_))
    }

    pub fn despawn_timer(&self) -> Option<&DespawnTimer> {
        self.despawn.as_ref()
    }

    pub fn probe_timer(&self) -> &IntervalTimer {
        &self.probe
    }

    /// Advances the probe timer; returns whether a probe is due.
    ///
    /// A due probe resets the interval.
    pub(crate) fn advance_probe(&mut self, time: Duration) -> bool {
        self.probe.update(time);
        if !self.probe.passed() {
            return false;
        }
        self.probe.reset();
        true
    }

    /// Starts the despawn countdown unless one already exists.
    ///
    /// Returns `true` when a countdown was started by this call.
    pub(crate) fn ensure_despawn(&mut self, lifetime: impl FnOnce(&Self) -> Duration) -> bool {
        if self.despawn.is_some() {
            return false;
        }
        self.despawn = Some(DespawnTimer::new(lifetime(self)));
        true
    }

    /// Advances the despawn countdown; returns whether it has run out.
    pub(crate) fn advance_despawn(&mut self, time: Duration) -> bool {
        match self.despawn.as_mut() {
            Some(timer) => {
                timer.advance(time);
                timer.expired()
            }
            None => false,
        }
    }

    pub(crate) fn set_state(&mut self, state: DeviceState) {
        // Dead is terminal
        if !self.is_dead() {
            self.state = state;
        }
    }
}
