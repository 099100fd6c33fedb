//! Data-driven content for the economy engine.
//!
//! Provides loaders that convert RON data files into `economy-core` catalog
//! types. Production catalogs come from the external store; these loaders
//! seed in-memory stores for tests, tools, and local development.

pub mod catalog;

pub use catalog::{CatalogLoader, CollectibleCatalog};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
