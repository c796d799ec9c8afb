//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`CooldownStore`]: per-address claim history
//!
//! ## Implementations
//!
//! - `in_memory`: process-local store; history is lost on restart

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryCooldownStore;
pub use traits::{CooldownStore, RepositoryError, RepositoryResult};
