//! # In-Memory Repositories
//!
//! - [`InMemoryCooldownStore`]: claim history
//!
//! ## Thread Safety
//!
//! Records are kept in a sharded `DashMap`; per-key operations are atomic.

pub mod cooldown_store;

pub use cooldown_store::InMemoryCooldownStore;
