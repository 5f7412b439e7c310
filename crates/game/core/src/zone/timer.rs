//! Tick-driven timers.
use std::time::Duration;

/// Recurring timer advanced by simulation ticks.
///
/// The timer never fires on its own; callers check [`passed`](Self::passed)
/// after [`update`](Self::update) and [`reset`](Self::reset) it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    pub fn update(&mut self, time: Duration) {
        self.elapsed = self.elapsed.saturating_add(time);
    }

    pub fn passed(&self) -> bool {
        self.elapsed >= self.interval
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// One-shot countdown. Progress only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DespawnTimer {
    lifetime: Duration,
    elapsed: Duration,
}

impl DespawnTimer {
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, time: Duration) {
        self.elapsed = self.elapsed.saturating_add(time);
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= self.lifetime
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.lifetime.saturating_sub(self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_passes_once_accumulated() {
        let mut timer = IntervalTimer::new(Duration::from_secs(2));

        timer.update(Duration::from_millis(1500));
        assert!(!timer.passed());

        timer.update(Duration::from_millis(500));
        assert!(timer.passed());

        timer.reset();
        assert!(!timer.passed());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn despawn_countdown_saturates() {
        let mut timer = DespawnTimer::new(Duration::from_secs(3));

        timer.advance(Duration::from_secs(2));
        assert_eq!(timer.remaining(), Duration::from_secs(1));

        timer.advance(Duration::from_secs(5));
        assert!(timer.expired());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }
}
