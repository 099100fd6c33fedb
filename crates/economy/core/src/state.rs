//! Per-user progression and ticket state.
//!
//! Stored versus derived: `total_xp` is the source of truth and only ever
//! grows; `level` is derived from it by the leveling curve but cached in
//! storage for display. Ticket balances are guarded by the store's atomic
//! primitives; this module only carries the value.

use crate::ids::UserId;
use crate::leveling::{LevelProgress, resolve_level};

/// A user's progression: total XP and cached level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionState {
    pub user_id: UserId,
    /// Monotonically non-decreasing over the account's lifetime.
    pub total_xp: u64,
    /// Cached level, >= 1. Derived from `total_xp`.
    pub level: u32,
}

impl ProgressionState {
    /// State for a freshly created account.
    pub fn new_account(user_id: UserId) -> Self {
        Self {
            user_id,
            total_xp: 0,
            level: 1,
        }
    }

    /// Apply an XP grant, resolving any level-ups it causes.
    ///
    /// Returns the successor state and the resolution details for the
    /// caller's reward notification. The grant is additive only; XP never
    /// decreases.
    pub fn grant_xp(&self, xp: u32) -> (Self, LevelProgress) {
        debug_assert!(self.level >= 1, "stored level below 1 for {}", self.user_id);

        let total_xp = self.total_xp + xp as u64;
        let progress = resolve_level(total_xp, self.level);
        let next = Self {
            user_id: self.user_id,
            total_xp,
            level: progress.level,
        };
        (next, progress)
    }
}

/// A user's spendable ticket balance. Non-negative by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicketBalance {
    pub user_id: UserId,
    pub tickets: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_starts_at_level_one_with_zero_xp() {
        let state = ProgressionState::new_account(UserId(1));
        assert_eq!(state.total_xp, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn grant_accumulates_without_leveling_below_threshold() {
        let state = ProgressionState::new_account(UserId(1));
        let (next, progress) = state.grant_xp(600);
        assert_eq!(next.total_xp, 600);
        assert_eq!(next.level, 1);
        assert!(!progress.leveled_up);
        assert_eq!(progress.current_level_xp, 600);
    }

    #[test]
    fn grant_cascades_across_levels() {
        let state = ProgressionState {
            user_id: UserId(1),
            total_xp: 3500,
            level: 1,
        };
        let (next, progress) = state.grant_xp(600);
        // 4100 total crosses 1000 (level 1) and 2828 (level 2)
        assert_eq!(next.level, 3);
        assert!(progress.leveled_up);
        assert_eq!(progress.current_level_xp, 4100 - 3828);
    }

    #[test]
    fn total_xp_round_trips_through_grants() {
        let state = ProgressionState::new_account(UserId(1));
        let (a, _) = state.grant_xp(250);
        let (b, _) = a.grant_xp(0);
        assert_eq!(b.total_xp, 250);
        assert!(b.total_xp >= a.total_xp);
    }
}
