//! Runtime orchestration for the progression & gacha economy.
//!
//! This crate wires the pure calculators from `economy-core` to the external
//! persistent store and exposes the two entry points the application calls:
//! diary-entry rewards and gacha redemption. Consumers construct a
//! [`ProgressionOrchestrator`] over any [`EconomyStore`] implementation.
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] hosts the entry points and compensation logic
//! - [`store`] defines the persistence boundary and the in-memory store
//! - [`config`] carries tunables (draw cap, retry policy)
//! - [`rng`] provides the entropy-backed draw oracle

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod rng;
pub mod store;

pub use config::{EconomyConfig, RetryPolicy};
pub use error::{EconomyError, Result};
pub use orchestrator::{ProgressionOrchestrator, RewardNotification};
pub use rng::EntropyRng;
pub use store::{EconomyStore, MemoryStore, StoreError};
