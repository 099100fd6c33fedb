//! Progression orchestrator.
//!
//! The two entry points the application calls: [`on_diary_created`] when a
//! diary entry is saved for the first time, and [`redeem`] when a user spends
//! tickets on gacha draws. The orchestrator owns the ordering and
//! failure-handling rules; all arithmetic lives in `economy-core`.
//!
//! Redemption hazard: once tickets are spent, the user has paid. Persistence
//! after the spend is retried to completion and, if it still fails, a
//! compensating refund covering the draws that did not land is granted; a
//! redemption is never silently abandoned between spend and settlement.
//!
//! [`on_diary_created`]: ProgressionOrchestrator::on_diary_created
//! [`redeem`]: ProgressionOrchestrator::redeem

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{error, info, warn};

use economy_core::{
    Catalog, CollectibleId, DrawEngine, DrawResult, RngOracle, UserId, compute_reward, reconcile,
    redemption_seed,
};

use crate::config::EconomyConfig;
use crate::error::{EconomyError, Result};
use crate::store::{EconomyStore, StoreError};

/// Payload returned to the UI after a diary entry grants its reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardNotification {
    pub xp: u32,
    pub tickets: u32,
    pub leveled_up: bool,
    /// Level after the grant. `None` when the progression side was
    /// unreachable and the level could not be computed this call.
    pub new_level: Option<u32>,
    /// True when a store operation on either side failed after retries. The
    /// amounts above are still correct (they re-derive deterministically
    /// from the entry) but storage is temporarily behind.
    pub degraded: bool,
}

/// Settlement failure carrying how many draws made it into the inventory
/// before the store gave out. Drives the partial refund in
/// [`ProgressionOrchestrator::redeem`].
struct SettleFailure {
    source: StoreError,
    settled: u32,
}

/// Entry point gluing calculators, store, and draw engine together.
pub struct ProgressionOrchestrator<S> {
    store: Arc<S>,
    rng: Arc<dyn RngOracle>,
    config: EconomyConfig,
    /// Per-process counter feeding the redemption seed, so concurrent
    /// redemptions get distinct draw sequences.
    redemption_nonce: AtomicU64,
}

impl<S: EconomyStore> ProgressionOrchestrator<S> {
    pub fn new(store: Arc<S>, rng: Arc<dyn RngOracle>, config: EconomyConfig) -> Self {
        Self {
            store,
            rng,
            config,
            redemption_nonce: AtomicU64::new(0),
        }
    }

    /// Grant the reward for a newly created diary entry.
    ///
    /// Called once per created entry, never on edits; recomputing on edit
    /// would let a user farm rewards by re-saving. The ticket grant and the
    /// XP/level side are attempted independently: neither waits on the
    /// other's store calls, so a progression outage never blocks a ticket
    /// grant and vice versa. Store failures on either side degrade the
    /// notification rather than failing the save.
    pub async fn on_diary_created(
        &self,
        user: UserId,
        total_chars: u32,
    ) -> Result<RewardNotification> {
        let reward = compute_reward(total_chars);
        let mut degraded = false;

        if reward.tickets > 0
            && let Err(err) = self
                .with_retry("grant_tickets", || {
                    self.store.grant_tickets(user, reward.tickets)
                })
                .await
        {
            warn!(%user, tickets = reward.tickets, error = %err, "ticket grant failed");
            degraded = true;
        }

        let progress = match self
            .with_retry("read_progression", || self.store.read_progression(user))
            .await
        {
            Ok(progression) => {
                let (next, progress) = progression.grant_xp(reward.xp);
                if reward.xp > 0
                    && let Err(err) = self
                        .with_retry("write_progression", || {
                            self.store.write_progression(user, next.total_xp, next.level)
                        })
                        .await
                {
                    warn!(%user, total_xp = next.total_xp, level = next.level, error = %err,
                        "progression write failed");
                    degraded = true;
                }
                Some(progress)
            }
            Err(err) => {
                // The grant re-derives deterministically from the entry, so
                // the caller can replay it once the store recovers.
                warn!(%user, xp = reward.xp, error = %err, "progression read failed");
                degraded = true;
                None
            }
        };

        if let Some(progress) = progress
            && progress.leveled_up
        {
            info!(%user, level = progress.level, "level up");
        }

        Ok(RewardNotification {
            xp: reward.xp,
            tickets: reward.tickets,
            leveled_up: progress.is_some_and(|p| p.leveled_up),
            new_level: progress.map(|p| p.level),
            degraded,
        })
    }

    /// Redeem `count` tickets for `count` gacha draws.
    ///
    /// Aborts with no side effects on an invalid count, an empty catalog, or
    /// an insufficient balance. After a successful spend, settlement runs to
    /// completion; if it fails partway, the draws already persisted stay in
    /// the inventory and only the unsettled remainder is refunded, one
    /// ticket per draw that did not land.
    pub async fn redeem(&self, user: UserId, count: u32) -> Result<Vec<DrawResult>> {
        let max = self.config.max_draws_per_redemption;
        if count == 0 || count > max {
            return Err(EconomyError::InvalidDrawCount { count, max });
        }

        let entries = self
            .with_retry("list_catalog", || self.store.list_catalog())
            .await
            .map_err(EconomyError::from)?;
        let catalog = Catalog::new(entries).map_err(|_| EconomyError::NoCollectiblesAvailable)?;

        // Spend is deliberately not retried: a lost acknowledgement cannot be
        // distinguished from a lost request, and a blind retry could double
        // the decrement.
        let remaining = self
            .store
            .spend_tickets(user, count)
            .await
            .map_err(EconomyError::from)?;
        info!(%user, count, remaining, "tickets spent for redemption");

        match self.settle(user, &catalog, count).await {
            Ok(draws) => Ok(draws),
            Err(SettleFailure { source, settled }) => {
                let refund = count - settled;
                error!(%user, count, settled, refund, error = %source,
                    "settlement failed after spend, refunding unsettled draws");
                let refunded = self
                    .with_retry("grant_tickets", || self.store.grant_tickets(user, refund))
                    .await
                    .is_ok();
                if !refunded {
                    error!(%user, refund, "compensating refund failed, operator attention needed");
                }
                Err(EconomyError::RedemptionFailed { refunded, source })
            }
        }
    }

    /// Draw, reconcile, and persist one paid-for redemption.
    ///
    /// Tracks how many draws reached the inventory so the caller can refund
    /// exactly the remainder. Once every upsert has landed the user owns the
    /// full batch; a history append that still fails after retries is an
    /// audit gap to log, not grounds to fail the redemption.
    async fn settle(
        &self,
        user: UserId,
        catalog: &Catalog,
        count: u32,
    ) -> std::result::Result<Vec<DrawResult>, SettleFailure> {
        let nonce = self.redemption_nonce.fetch_add(1, Ordering::Relaxed);
        let seed = redemption_seed(user, nonce);
        let draws = DrawEngine::draw(catalog, count, seed, self.rng.as_ref());
        let redeemed_at = Utc::now();

        let drawn_ids: Vec<CollectibleId> = draws.iter().map(|d| d.collectible.id).collect();
        let existing = match self
            .with_retry("read_ownership", || {
                self.store.read_ownership(user, &drawn_ids)
            })
            .await
        {
            Ok(existing) => existing,
            Err(source) => return Err(SettleFailure { source, settled: 0 }),
        };

        let outcome = reconcile(user, &draws, &existing, redeemed_at);

        let mut settled = 0;
        for record in outcome.new_records.iter().chain(&outcome.updated_records) {
            let prior = existing
                .get(&record.collectible_id)
                .map(|r| r.obtain_count)
                .unwrap_or(0);
            let delta = record.obtain_count - prior;
            let id = record.collectible_id;
            if let Err(source) = self
                .with_retry("upsert_ownership", || {
                    self.store.upsert_ownership(user, id, delta, redeemed_at)
                })
                .await
            {
                return Err(SettleFailure { source, settled });
            }
            settled += delta;
        }

        for entry in &outcome.history {
            if let Err(err) = self
                .with_retry("append_history", || {
                    self.store
                        .append_history(user, entry.collectible_id, entry.drawn_at)
                })
                .await
            {
                error!(%user, collectible = %entry.collectible_id, error = %err,
                    "draw history row lost");
            }
        }

        info!(%user, draws = draws.len(), new_collectibles = outcome.new_records.len(),
            "redemption settled");
        Ok(draws)
    }

    /// Run a store call, retrying transient backend failures with backoff.
    ///
    /// Only used for operations that are safe to repeat; the conditional
    /// ticket spend never goes through here.
    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        mut call: F,
    ) -> std::result::Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt + 1 < self.config.retry.max_attempts => {
                    warn!(operation, attempt, error = %err, "retrying store operation");
                    tokio::time::sleep(self.config.retry.backoff_after(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
