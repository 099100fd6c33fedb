//! Pure domain logic for the progression & gacha economy.
//!
//! This crate holds the deterministic core of the engine: how experience and
//! tickets are earned, how levels advance, how draws are resolved, and how
//! draw results merge into a user's inventory. Nothing here performs I/O,
//! reads a clock, or touches ambient state: every input is an explicit
//! parameter and every output is a value, so the whole crate is testable
//! without a store.
//!
//! Modules are organized by responsibility:
//! - [`leveling`] converts total XP into level progress
//! - [`reward`] converts diary entry length into XP/ticket grants
//! - [`catalog`] defines the collectible catalog and rarity tiers
//! - [`draw`] resolves uniform random draws against the catalog
//! - [`inventory`] merges draw batches into ownership records
//! - [`state`] holds per-user progression and ticket balances
//!
//! Persistence and orchestration live in the `runtime` crate.

pub mod catalog;
pub mod draw;
pub mod ids;
pub mod inventory;
pub mod leveling;
pub mod reward;
pub mod state;

pub use catalog::{Catalog, CatalogError, Collectible, RarityTier};
pub use draw::{
    DrawEngine, DrawResult, MAX_DRAWS_PER_REDEMPTION, PcgRng, RngOracle, redemption_seed,
};
pub use ids::{CollectibleId, UserId};
pub use inventory::{DrawHistoryEntry, OwnershipRecord, ReconcileOutcome, reconcile};
pub use leveling::{LevelProgress, cumulative_xp, required_xp, resolve_level};
pub use reward::{Reward, compute_reward};
pub use state::{ProgressionState, TicketBalance};
