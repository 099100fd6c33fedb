//! In-memory store implementation.
//!
//! Backs every runtime test. A single mutex guards all tables, so the
//! conditional decrement in [`MemoryStore::spend_tickets`] is genuinely
//! atomic, the same guarantee a production store provides with a guarded
//! `UPDATE`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use economy_core::{
    Collectible, CollectibleId, DrawHistoryEntry, OwnershipRecord, ProgressionState, UserId,
};

use super::{EconomyStore, StoreError};

#[derive(Default)]
struct Tables {
    progression: HashMap<UserId, ProgressionState>,
    tickets: HashMap<UserId, u32>,
    catalog: Vec<Collectible>,
    ownership: HashMap<(UserId, CollectibleId), OwnershipRecord>,
    history: Vec<DrawHistoryEntry>,
}

/// Mutex-guarded in-memory [`EconomyStore`].
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create a store serving `catalog` as its collectible reference data.
    pub fn new(catalog: Vec<Collectible>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                catalog,
                ..Tables::default()
            }),
        }
    }

    /// Provision an account with fresh progression and `tickets` tickets.
    ///
    /// Account creation lives outside the engine in production; tests use
    /// this to stand in for it.
    pub fn create_account(&self, user: UserId, tickets: u32) {
        let mut tables = self.lock();
        tables
            .progression
            .insert(user, ProgressionState::new_account(user));
        tables.tickets.insert(user, tickets);
    }

    /// Snapshot of the full draw history, in append order.
    pub fn history(&self) -> Vec<DrawHistoryEntry> {
        self.lock().history.clone()
    }

    /// Snapshot of one ownership record, if present.
    pub fn ownership(&self, user: UserId, id: CollectibleId) -> Option<OwnershipRecord> {
        self.lock().ownership.get(&(user, id)).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // Poisoning only happens if a panic escaped mid-mutation; tests want
        // the panic, not a masked lock error.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EconomyStore for MemoryStore {
    async fn read_progression(&self, user: UserId) -> Result<ProgressionState, StoreError> {
        self.lock()
            .progression
            .get(&user)
            .copied()
            .ok_or(StoreError::UnknownUser(user))
    }

    async fn write_progression(
        &self,
        user: UserId,
        total_xp: u64,
        level: u32,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        let state = tables
            .progression
            .get_mut(&user)
            .ok_or(StoreError::UnknownUser(user))?;
        state.total_xp = total_xp;
        state.level = level;
        Ok(())
    }

    async fn read_ticket_balance(&self, user: UserId) -> Result<u32, StoreError> {
        self.lock()
            .tickets
            .get(&user)
            .copied()
            .ok_or(StoreError::UnknownUser(user))
    }

    async fn spend_tickets(&self, user: UserId, amount: u32) -> Result<u32, StoreError> {
        let mut tables = self.lock();
        let balance = tables
            .tickets
            .get_mut(&user)
            .ok_or(StoreError::UnknownUser(user))?;
        if *balance < amount {
            return Err(StoreError::InsufficientBalance {
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        Ok(*balance)
    }

    async fn grant_tickets(&self, user: UserId, amount: u32) -> Result<u32, StoreError> {
        let mut tables = self.lock();
        let balance = tables
            .tickets
            .get_mut(&user)
            .ok_or(StoreError::UnknownUser(user))?;
        *balance += amount;
        Ok(*balance)
    }

    async fn list_catalog(&self) -> Result<Vec<Collectible>, StoreError> {
        Ok(self.lock().catalog.clone())
    }

    async fn read_ownership(
        &self,
        user: UserId,
        ids: &[CollectibleId],
    ) -> Result<HashMap<CollectibleId, OwnershipRecord>, StoreError> {
        let tables = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| tables.ownership.get(&(user, *id)).map(|r| (*id, r.clone())))
            .collect())
    }

    async fn upsert_ownership(
        &self,
        user: UserId,
        id: CollectibleId,
        delta: u32,
        obtained_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables
            .ownership
            .entry((user, id))
            .and_modify(|record| {
                record.obtain_count += delta;
                record.last_obtained_at = obtained_at;
            })
            .or_insert_with(|| OwnershipRecord {
                user_id: user,
                collectible_id: id,
                first_obtained_at: obtained_at,
                last_obtained_at: obtained_at,
                obtain_count: delta,
            });
        Ok(())
    }

    async fn append_history(
        &self,
        user: UserId,
        id: CollectibleId,
        drawn_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.lock().history.push(DrawHistoryEntry {
            user_id: user,
            collectible_id: id,
            drawn_at,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use economy_core::RarityTier;

    const USER: UserId = UserId(1);

    fn store() -> MemoryStore {
        let store = MemoryStore::new(vec![Collectible::new(
            CollectibleId(1),
            RarityTier::Normal,
            1,
        )]);
        store.create_account(USER, 10);
        store
    }

    #[tokio::test]
    async fn spend_decrements_when_covered() {
        let store = store();
        assert_eq!(store.spend_tickets(USER, 4).await.unwrap(), 6);
        assert_eq!(store.read_ticket_balance(USER).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn spend_refuses_overdraft_without_mutation() {
        let store = store();
        let err = store.spend_tickets(USER, 11).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientBalance {
                available: 10,
                requested: 11
            }
        ));
        assert_eq!(store.read_ticket_balance(USER).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn upsert_inserts_then_adds() {
        let store = store();
        let first = Utc::now();
        store
            .upsert_ownership(USER, CollectibleId(1), 2, first)
            .await
            .unwrap();
        let later = first + chrono::Duration::seconds(5);
        store
            .upsert_ownership(USER, CollectibleId(1), 3, later)
            .await
            .unwrap();

        let record = store.ownership(USER, CollectibleId(1)).unwrap();
        assert_eq!(record.obtain_count, 5);
        assert_eq!(record.first_obtained_at, first);
        assert_eq!(record.last_obtained_at, later);
    }

    #[tokio::test]
    async fn unknown_user_is_a_wiring_error() {
        let store = store();
        assert!(matches!(
            store.read_progression(UserId(999)).await,
            Err(StoreError::UnknownUser(_))
        ));
    }
}
