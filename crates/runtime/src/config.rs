//! Runtime configuration and environment loading.

use std::env;
use std::time::Duration;

use game_core::ZoneConfig;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub zone: ZoneConfig,
    /// Zone simulation step. `None` disables the timer; the zone then only
    /// advances on explicit step commands.
    pub tick_interval: Option<Duration>,
    pub message_buffer_size: usize,
    pub zone_command_buffer_size: usize,
    pub zone_effect_buffer_size: usize,
    pub relog: RelogConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            zone: ZoneConfig::default(),
            tick_interval: Some(Duration::from_millis(100)),
            message_buffer_size: 100,
            zone_command_buffer_size: 32,
            zone_effect_buffer_size: 256,
            relog: RelogConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TICK_INTERVAL_MS` - Zone step in milliseconds, 0 for manual stepping (default: 100)
    /// - `RELOG_DELAY_MS` - Delay before a forced relog deselects (default: 5000)
    /// - `MESSAGE_BUFFER` - Outbound message channel capacity (default: 100)
    /// - `ZONE_EFFECT_BUFFER` - Zone effect channel capacity (default: 256)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("TICK_INTERVAL_MS") {
            config.tick_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ms) = read_env::<u64>("RELOG_DELAY_MS") {
            config.relog.delay = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("MESSAGE_BUFFER") {
            config.message_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ZONE_EFFECT_BUFFER") {
            config.zone_effect_buffer_size = capacity.max(1);
        }

        config
    }

    pub fn with_zone(mut self, zone: ZoneConfig) -> Self {
        self.zone = zone;
        self
    }
}

/// Forced relog after a build reset.
#[derive(Debug, Clone)]
pub struct RelogConfig {
    pub delay: Duration,
    /// Notice text shown when the client has no translation.
    pub message: String,
    pub translation_key: String,
}

impl Default for RelogConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            message: "You will be automatically relogged in 5 seconds".to_owned(),
            translation_key: "relog_in_5_seconds".to_owned(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
