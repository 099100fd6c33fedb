//! Persistence boundary for the economy engine.
//!
//! The store is an external shared system (a hosted relational backend in
//! production); this module defines the contract the engine requires from it
//! and an in-memory implementation used by tests. The contract names which
//! operations must be atomic, most importantly the conditional ticket
//! decrement, rather than leaving that to call-site discipline.

mod error;
mod memory;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::EconomyStore;
