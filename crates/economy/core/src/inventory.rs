//! Inventory reconciliation.
//!
//! Merges a batch of draw results into a user's existing ownership records.
//! Pure computation: the caller supplies the existing records and the
//! redemption timestamp, and persists the outcome afterwards. Partitioning is
//! batch-aware: a collectible drawn three times in one batch produces a
//! single record delta of three, and three history rows.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::draw::DrawResult;
use crate::ids::{CollectibleId, UserId};

/// Per-user, per-collectible ownership count.
///
/// Unique per `(user_id, collectible_id)`. Created on first draw; afterwards
/// only `obtain_count` grows and `last_obtained_at` refreshes;
/// `first_obtained_at` never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnershipRecord {
    pub user_id: UserId,
    pub collectible_id: CollectibleId,
    pub first_obtained_at: DateTime<Utc>,
    pub last_obtained_at: DateTime<Utc>,
    /// How many times this collectible has been obtained. Always >= 1.
    pub obtain_count: u32,
}

/// One row per individual draw. Append-only, never deduplicated: this is
/// the audit trail, not the inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawHistoryEntry {
    pub user_id: UserId,
    pub collectible_id: CollectibleId,
    pub drawn_at: DateTime<Utc>,
}

/// Result of reconciling one draw batch against existing ownership.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Records for collectibles the user did not own before this batch.
    pub new_records: Vec<OwnershipRecord>,
    /// Previously-owned records with counts incremented and timestamps
    /// refreshed.
    pub updated_records: Vec<OwnershipRecord>,
    /// One entry per individual draw, in draw order.
    pub history: Vec<DrawHistoryEntry>,
}

/// Merge `draws` into `existing` ownership records.
///
/// `existing` maps collectible id to the user's current record for it;
/// collectibles absent from the map are treated as unowned. `drawn_at` is the
/// redemption time, applied uniformly to the whole batch.
pub fn reconcile(
    user_id: UserId,
    draws: &[DrawResult],
    existing: &HashMap<CollectibleId, OwnershipRecord>,
    drawn_at: DateTime<Utc>,
) -> ReconcileOutcome {
    // Batch counts first: the same collectible drawn twice must land as a
    // single record with obtain_count covering both draws.
    let mut batch_counts: HashMap<CollectibleId, u32> = HashMap::new();
    let mut batch_order: Vec<CollectibleId> = Vec::new();
    for draw in draws {
        let id = draw.collectible.id;
        let count = batch_counts.entry(id).or_insert(0);
        if *count == 0 {
            batch_order.push(id);
        }
        *count += 1;
    }

    let mut outcome = ReconcileOutcome::default();

    for id in batch_order {
        let batch_count = batch_counts[&id];
        match existing.get(&id) {
            Some(record) => {
                let mut updated = record.clone();
                updated.obtain_count += batch_count;
                updated.last_obtained_at = drawn_at;
                outcome.updated_records.push(updated);
            }
            None => outcome.new_records.push(OwnershipRecord {
                user_id,
                collectible_id: id,
                first_obtained_at: drawn_at,
                last_obtained_at: drawn_at,
                obtain_count: batch_count,
            }),
        }
    }

    outcome.history = draws
        .iter()
        .map(|draw| DrawHistoryEntry {
            user_id,
            collectible_id: draw.collectible.id,
            drawn_at,
        })
        .collect();

    outcome
}
