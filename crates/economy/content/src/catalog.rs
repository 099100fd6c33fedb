//! Collectible catalog loader.

use std::path::Path;

use economy_core::{Catalog, Collectible};
use serde::{Deserialize, Serialize};

use crate::{LoadResult, read_file};

/// Collectible catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleCatalog {
    pub collectibles: Vec<Collectible>,
}

/// Loader for collectible catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// Fails on unreadable files, malformed RON, unknown rarity names, and
    /// empty catalogs.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::from_str(&content)
    }

    /// Parse a catalog from RON text.
    pub fn from_str(content: &str) -> LoadResult<Catalog> {
        let catalog: CollectibleCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse collectible catalog RON: {}", e))?;

        Catalog::new(catalog.collectibles)
            .map_err(|e| anyhow::anyhow!("Invalid collectible catalog: {}", e))
    }
}
