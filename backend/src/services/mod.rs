//! Business logic services for the Roastery Inventory Platform

pub mod cupping;
pub mod forecast;
pub mod inventory;
pub mod sales;
pub mod settings;

pub use cupping::CuppingService;
pub use forecast::ForecastService;
pub use inventory::InventoryService;
pub use sales::SalesService;
pub use settings::{SettingsService, ThresholdUpdate};
