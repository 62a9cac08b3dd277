//! Domain models for the Roastery Inventory Platform

mod cupping;
mod green;
mod inventory;
mod roasted;
mod sales;
mod settings;

pub use cupping::*;
pub use green::*;
pub use inventory::*;
pub use roasted::*;
pub use sales::*;
pub use settings::*;
