//! Zone configuration loader.

use std::path::Path;

use game_core::ZoneConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for zone configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load zone config from a TOML file.
    ///
    /// Missing tables and keys fall back to [`ZoneConfig::default`].
    pub fn load(path: &Path) -> LoadResult<ZoneConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse zone config from TOML text.
    pub fn parse(content: &str) -> LoadResult<ZoneConfig> {
        let config: ZoneConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse zone config TOML: {}", e))?;

        if config.device.probe_interval_ms == 0 {
            anyhow::bail!("device.probe_interval_ms must be positive");
        }

        Ok(config)
    }
}
