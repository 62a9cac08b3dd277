//! HTTP request handlers

pub mod cupping;
pub mod forecast;
pub mod health;
pub mod inventory;
pub mod sales;
pub mod settings;

pub use cupping::*;
pub use forecast::*;
pub use health::*;
pub use inventory::*;
pub use sales::*;
pub use settings::*;
