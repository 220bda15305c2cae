//! Shared types and models for the stock dashboard
//!
//! This crate contains the records exchanged between the API layer, the
//! analytics engine and the browser (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
