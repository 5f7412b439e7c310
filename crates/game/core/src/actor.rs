//! Characters, accounts and robots touched by item activations.

use std::collections::BTreeMap;

use crate::state::{AccountId, EntityId};

/// Persisted character record.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: EntityId,
    pub account: AccountId,
    /// Character is inside a docking base.
    pub docked: bool,
    /// Character is currently selected by a session.
    pub in_game: bool,
    /// Points spent per extension (skill) id.
    pub extensions: BTreeMap<u32, u32>,
}

impl Character {
    pub fn new(id: EntityId, account: AccountId) -> Self {
        Self {
            id,
            account,
            ..Self::default()
        }
    }

    /// Total points currently allocated to extensions.
    pub fn spent_points(&self) -> u32 {
        self.extensions.values().sum()
    }

    /// Clears every extension allocation and returns the points released.
    pub fn reset_extensions(&mut self) -> u32 {
        let released = self.spent_points();
        self.extensions.clear();
        released
    }
}

/// Time-limited bonus granted by a boost item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostSpec {
    /// Bonus multiplier in percent (150 = +50%).
    pub multiplier_percent: u32,
    pub duration_secs: u64,
}

/// Boost currently applied to an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveBoost {
    pub multiplier_percent: u32,
    /// Unix epoch milliseconds.
    pub expires_at_ms: u64,
}

/// Persisted account record.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    pub id: AccountId,
    /// Unallocated extension points available to every character.
    pub extension_points: u32,
    pub boost: Option<ActiveBoost>,
    pub respec_count: u32,
}

impl Account {
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Applies `spec` at `now_ms`.
    ///
    /// A still-running boost is extended by the new duration; an expired one
    /// is replaced.
    pub fn apply_boost(&mut self, spec: BoostSpec, now_ms: u64) {
        let start = match self.boost {
            Some(active) if active.expires_at_ms > now_ms => active.expires_at_ms,
            _ => now_ms,
        };

        self.boost = Some(ActiveBoost {
            multiplier_percent: spec.multiplier_percent,
            expires_at_ms: start.saturating_add(spec.duration_secs.saturating_mul(1000)),
        });
    }
}

/// RGB tint applied to a robot's hull.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tint(pub u32);

/// Persisted robot record (only the parts activations touch).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id: EntityId,
    pub owner: EntityId,
    pub tint: Option<Tint>,
}
