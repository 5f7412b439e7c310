//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use game_core::{ItemCatalog, ItemDefinition, ItemEffect, ItemKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate an item catalog from RON text.
    ///
    /// Rejects duplicate ids, effects that do not match the kind tag, and
    /// references to definitions that are not in the catalog.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for definition in &file.items {
            if !seen.insert(definition.id) {
                anyhow::bail!("duplicate item definition {}", definition.id);
            }
            check_effect_matches_kind(definition)?;
        }

        for definition in &file.items {
            for referenced in referenced_definitions(&definition.effect) {
                if !seen.contains(&referenced) {
                    anyhow::bail!(
                        "{} ({}) references unknown definition {}",
                        definition.name,
                        definition.id,
                        referenced
                    );
                }
            }
        }

        Ok(ItemCatalog::new(file.items))
    }
}

fn check_effect_matches_kind(definition: &ItemDefinition) -> LoadResult<()> {
    let matches = matches!(
        (definition.kind, &definition.effect),
        (ItemKind::Lottery, ItemEffect::Lottery(_))
            | (ItemKind::Boost, ItemEffect::Boost(_))
            | (ItemKind::Paint, ItemEffect::Paint(_))
            | (ItemKind::TemplateUnpack, ItemEffect::TemplateUnpack { .. })
            | (ItemKind::StatReset, ItemEffect::StatReset)
            | (ItemKind::TeleportRedeem, ItemEffect::TeleportRedeem { .. })
            | (ItemKind::Commodity, ItemEffect::None)
    );

    if !matches {
        anyhow::bail!(
            "{} ({}) is tagged {} but carries effect {:?}",
            definition.name,
            definition.id,
            definition.kind,
            definition.effect
        );
    }
    Ok(())
}

fn referenced_definitions(effect: &ItemEffect) -> Vec<game_core::DefinitionId> {
    match effect {
        ItemEffect::Lottery(table) => table.entries.iter().map(|e| e.definition).collect(),
        ItemEffect::TemplateUnpack { produces } => vec![*produces],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::DefinitionId;

    const CATALOG: &str = r#"
        (
            items: [
                (id: 1, name: "scrap", kind: commodity, stackable: true),
                (
                    id: 2,
                    name: "crate_small",
                    kind: lottery,
                    stackable: true,
                    effect: Lottery([(definition: 1, weight: 5)]),
                ),
                (
                    id: 3,
                    name: "ep_boost",
                    kind: boost,
                    effect: Boost((multiplier_percent: 150, duration_secs: 3600)),
                ),
            ],
        )
    "#;

    #[test]
    fn parses_catalog() {
        let catalog = ItemLoader::parse(CATALOG).unwrap();

        assert_eq!(catalog.len(), 3);
        let crate_small = catalog.get(DefinitionId(2)).unwrap();
        assert_eq!(crate_small.kind, ItemKind::Lottery);
        assert!(crate_small.stackable);
        assert!(!catalog.get(DefinitionId(3)).unwrap().stackable);
    }

    #[test]
    fn rejects_unknown_reward_reference() {
        let broken = CATALOG.replace("definition: 1", "definition: 42");
        let err = ItemLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("unknown definition"));
    }

    #[test]
    fn rejects_kind_effect_mismatch() {
        let broken = CATALOG.replace("kind: boost", "kind: paint");
        assert!(ItemLoader::parse(&broken).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.ron");
        std::fs::write(&path, CATALOG).unwrap();

        assert_eq!(ItemLoader::load(&path).unwrap().len(), 3);
    }
}
