//! Store contract for the economy engine.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use economy_core::{Collectible, CollectibleId, OwnershipRecord, ProgressionState, UserId};

use super::StoreError;

/// Persistent store operations the engine requires.
///
/// One method per logical operation; transport and schema are the
/// implementation's concern. Two operations carry atomicity requirements the
/// engine depends on for correctness:
///
/// - [`spend_tickets`](Self::spend_tickets) must be a single atomic
///   conditional decrement (compare-and-swap or a server-side decrement
///   guarded by `balance >= amount`). Two redemptions racing for the same
///   user must never both succeed past the available balance.
/// - [`upsert_ownership`](Self::upsert_ownership) must be insert-or-add,
///   never read-modify-write, so concurrent redemptions drawing the same
///   collectible do not lose counts.
#[async_trait]
pub trait EconomyStore: Send + Sync {
    /// Read a user's progression state.
    async fn read_progression(&self, user: UserId) -> Result<ProgressionState, StoreError>;

    /// Persist a user's total XP and cached level.
    async fn write_progression(
        &self,
        user: UserId,
        total_xp: u64,
        level: u32,
    ) -> Result<(), StoreError>;

    /// Read a user's current ticket balance.
    async fn read_ticket_balance(&self, user: UserId) -> Result<u32, StoreError>;

    /// Atomically spend `amount` tickets if the balance covers it.
    ///
    /// Returns the new balance. Fails with
    /// [`StoreError::InsufficientBalance`] without mutation otherwise.
    async fn spend_tickets(&self, user: UserId, amount: u32) -> Result<u32, StoreError>;

    /// Atomically add `amount` tickets. Returns the new balance.
    async fn grant_tickets(&self, user: UserId, amount: u32) -> Result<u32, StoreError>;

    /// List the full collectible catalog.
    async fn list_catalog(&self) -> Result<Vec<Collectible>, StoreError>;

    /// Read the user's ownership records for the given collectibles.
    ///
    /// Collectibles the user does not own are absent from the result.
    async fn read_ownership(
        &self,
        user: UserId,
        ids: &[CollectibleId],
    ) -> Result<HashMap<CollectibleId, OwnershipRecord>, StoreError>;

    /// Insert-or-add `delta` to the user's ownership count for `id`,
    /// refreshing the last-obtained timestamp. First insert also sets the
    /// first-obtained timestamp.
    async fn upsert_ownership(
        &self,
        user: UserId,
        id: CollectibleId,
        delta: u32,
        obtained_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Append one draw history row. Append-only; rows are never mutated.
    async fn append_history(
        &self,
        user: UserId,
        id: CollectibleId,
        drawn_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
