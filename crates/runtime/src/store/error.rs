//! Store error taxonomy.

use economy_core::UserId;

/// Failures surfaced by an [`super::EconomyStore`] implementation.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StoreError {
    /// Conditional ticket decrement found fewer tickets than requested.
    /// The balance was not mutated.
    #[error("insufficient ticket balance: {available} available, {requested} requested")]
    InsufficientBalance { available: u32, requested: u32 },

    /// No account rows exist for this user. Accounts are provisioned outside
    /// the engine, so this indicates a wiring bug, not a user action.
    #[error("no account records for {0}")]
    UnknownUser(UserId),

    /// Opaque backend failure (connection loss, timeout, server error).
    /// Retryable for idempotent operations.
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether retrying the same call can succeed.
    ///
    /// Only transient backend failures qualify; balance and account errors
    /// are stable outcomes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}
