//! # API Layer
//!
//! - [`rest`]: axum HTTP endpoints

pub mod rest;
