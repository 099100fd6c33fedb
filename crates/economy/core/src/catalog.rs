//! Collectible catalog and rarity tiers.
//!
//! The catalog is long-lived reference data loaded from the external store
//! (or from content files in tests and tools). It is immutable once built
//! and guaranteed non-empty, so the draw path never has to re-check.

use crate::ids::CollectibleId;

/// Rarity classification of a collectible.
///
/// Used only for display styling. Draw odds are uniform across the catalog;
/// rarity does not bias selection (see [`crate::draw`]).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RarityTier {
    Normal,
    Rare,
    SuperRare,
    UltraRare,
}

/// One collectible in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collectible {
    pub id: CollectibleId,
    pub rarity: RarityTier,
    /// Declared drop weight from the source data model.
    ///
    /// Carried through so a weighted draw engine can be introduced without a
    /// schema change, but the current engine draws uniformly and ignores it.
    pub display_weight: u32,
}

impl Collectible {
    pub fn new(id: CollectibleId, rarity: RarityTier, display_weight: u32) -> Self {
        Self {
            id,
            rarity,
            display_weight,
        }
    }
}

/// Errors building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An empty catalog is a configuration error, not a user-facing state.
    #[error("collectible catalog is empty")]
    Empty,
}

/// Immutable, non-empty collection of collectibles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Collectible>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty entry list.
    pub fn new(entries: Vec<Collectible>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries })
    }

    /// Number of entries. Always at least 1.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry at `index`. Panics on out-of-range, which cannot happen for
    /// indices produced by [`crate::draw::RngOracle::index`].
    pub fn get(&self, index: usize) -> &Collectible {
        &self.entries[index]
    }

    pub fn entries(&self) -> &[Collectible] {
        &self.entries
    }
}
