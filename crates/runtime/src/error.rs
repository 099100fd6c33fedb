//! Unified error types surfaced by the orchestrator.
//!
//! A closed taxonomy rather than ad hoc nullable fields: the UI matches on
//! these variants for user-facing messaging. Only the first two variants are
//! user-recoverable; everything else is logged and shown as a generic
//! failure.

use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, EconomyError>;

#[derive(Debug, Error)]
pub enum EconomyError {
    /// The user asked for more draws than they hold tickets. Recoverable by
    /// earning more tickets; never retried automatically.
    #[error("insufficient ticket balance: {available} available, {requested} requested")]
    InsufficientBalance { available: u32, requested: u32 },

    /// The store returned an empty catalog. Configuration error, fatal to
    /// the redemption.
    #[error("no collectibles available to draw")]
    NoCollectiblesAvailable,

    /// Redemption count outside `1..=max`. The UI bounds this before
    /// calling; seeing it means a client bug.
    #[error("invalid draw count {count}: must be between 1 and {max}")]
    InvalidDrawCount { count: u32, max: u32 },

    /// A store operation failed before any tickets were spent.
    #[error("store operation failed")]
    Store(#[source] StoreError),

    /// Persistence failed after tickets were spent. `refunded` reports
    /// whether the compensating ticket grant landed; if false, the loss
    /// needs operator attention.
    #[error("redemption failed after ticket spend (refunded: {refunded})")]
    RedemptionFailed {
        refunded: bool,
        #[source]
        source: StoreError,
    },
}

impl From<StoreError> for EconomyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientBalance {
                available,
                requested,
            } => EconomyError::InsufficientBalance {
                available,
                requested,
            },
            other => EconomyError::Store(other),
        }
    }
}
