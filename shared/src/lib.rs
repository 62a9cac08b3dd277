//! Shared types, models and the forecasting core for the Roastery Inventory Platform
//!
//! This crate is used by the backend server and compiled to WASM for the
//! browser dashboard, so nothing in it performs I/O.

pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use forecast::*;
pub use models::*;
pub use types::*;
pub use validation::*;
