//! Server configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

/// Process-level settings for the game server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `zone.toml` and `items.ron`.
    pub content_dir: PathBuf,
    /// Overrides `<content_dir>/zone.toml`.
    pub zone_config: Option<PathBuf>,
    /// Overrides `<content_dir>/items.ron`.
    pub item_catalog: Option<PathBuf>,
    /// Also write logs to daily files in this directory.
    pub log_dir: Option<PathBuf>,
    pub runtime: RuntimeConfig,
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CONTENT_DIR` - Content directory (default: `crates/game/content/data`)
    /// - `ZONE_CONFIG` - Zone tuning file
    /// - `ITEM_CATALOG` - Item definition file
    /// - `LOG_DIR` - Log file directory (default: stderr only)
    ///
    /// Runtime settings are read by [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            content_dir: env::var_os("CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("crates/game/content/data")),
            zone_config: env::var_os("ZONE_CONFIG").map(PathBuf::from),
            item_catalog: env::var_os("ITEM_CATALOG").map(PathBuf::from),
            log_dir: env::var_os("LOG_DIR").map(PathBuf::from),
            runtime: RuntimeConfig::from_env(),
        }
    }
}
