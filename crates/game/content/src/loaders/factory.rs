//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use game_core::{ItemCatalog, ZoneConfig};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all server content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── zone.toml
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load zone configuration from `zone.toml`.
    pub fn load_zone_config(&self) -> LoadResult<ZoneConfig> {
        ConfigLoader::load(&self.data_dir.join("zone.toml"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{DefinitionId, ItemKind};

    fn shipped() -> ContentFactory {
        ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    #[test]
    fn shipped_content_loads() {
        let factory = shipped();

        let items = factory.load_items().unwrap();
        assert_eq!(
            items.get(DefinitionId(104)).map(|d| d.kind),
            Some(ItemKind::StatReset)
        );

        let zone = factory.load_zone_config().unwrap();
        assert_eq!(zone.device.despawn_time_ms, Some(1_800_000));
    }
}
