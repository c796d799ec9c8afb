//! # Application Layer
//!
//! Use cases orchestrating the domain and infrastructure layers.
//!
//! - [`services`]: claim and balance use cases
//! - [`error`]: application error taxonomy

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
