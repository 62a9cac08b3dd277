//! Persistence port for inventory records
//!
//! Services talk to [`InventoryRepository`] only; the concrete adapter is
//! picked from configuration at startup.

use async_trait::async_trait;
use shared::{
    CuppingRecord, GreenCoffeeBatch, InventorySnapshot, RoastedCoffeeBatch, SalesEntry,
    ThresholdPolicy,
};
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryInventoryRepository;
pub use postgres::PgInventoryRepository;

/// Typed CRUD over every record the forecasting engine reads
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    // ===== Green coffee =====

    /// All green batches in the order they were recorded
    async fn list_green_batches(&self) -> AppResult<Vec<GreenCoffeeBatch>>;

    async fn get_green_batch(&self, id: Uuid) -> AppResult<Option<GreenCoffeeBatch>>;

    async fn insert_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<()>;

    /// Replace a stored batch; `false` when no batch has that id
    async fn update_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<bool>;

    async fn delete_green_batch(&self, id: Uuid) -> AppResult<bool>;

    // ===== Roasted coffee =====

    async fn list_roasted_batches(&self) -> AppResult<Vec<RoastedCoffeeBatch>>;

    async fn insert_roasted_batch(&self, batch: &RoastedCoffeeBatch) -> AppResult<()>;

    async fn delete_roasted_batch(&self, id: Uuid) -> AppResult<bool>;

    // ===== Sales =====

    async fn list_sales_entries(&self) -> AppResult<Vec<SalesEntry>>;

    async fn insert_sales_entry(&self, entry: &SalesEntry) -> AppResult<()>;

    async fn delete_sales_entry(&self, id: Uuid) -> AppResult<bool>;

    // ===== Cupping =====

    async fn list_cupping_records(&self) -> AppResult<Vec<CuppingRecord>>;

    async fn insert_cupping_record(&self, record: &CuppingRecord) -> AppResult<()>;

    async fn delete_cupping_record(&self, id: Uuid) -> AppResult<bool>;

    // ===== Settings =====

    /// Stored threshold policy, or the default when none has been saved
    async fn get_thresholds(&self) -> AppResult<ThresholdPolicy>;

    async fn save_thresholds(&self, policy: &ThresholdPolicy) -> AppResult<()>;

    /// Storage reachability, reported by the health endpoint
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    /// Name reported by the health endpoint
    fn backend_name(&self) -> &'static str;

    /// Everything the forecasting engine needs, in one read
    async fn snapshot(&self) -> AppResult<InventorySnapshot> {
        Ok(InventorySnapshot {
            green_batches: self.list_green_batches().await?,
            roasted_batches: self.list_roasted_batches().await?,
            sales_entries: self.list_sales_entries().await?,
            cupping_records: self.list_cupping_records().await?,
            thresholds: self.get_thresholds().await?,
        })
    }
}

/// Repository handle stored in application state
pub type SharedRepository = std::sync::Arc<dyn InventoryRepository>;
