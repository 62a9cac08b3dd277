//! In-memory repository adapter
//!
//! Default backend for local runs and the test suite. Records keep their
//! insertion order, matching what the Postgres adapter returns.

use async_trait::async_trait;
use shared::{
    CuppingRecord, GreenCoffeeBatch, InventorySnapshot, RoastedCoffeeBatch, SalesEntry,
    ThresholdPolicy,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InventoryRepository;
use crate::error::AppResult;

#[derive(Debug, Default)]
pub struct MemoryInventoryRepository {
    state: RwLock<InventorySnapshot>,
}

impl MemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records
    pub fn with_snapshot(snapshot: InventorySnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> bool {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    items.len() != before
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn list_green_batches(&self) -> AppResult<Vec<GreenCoffeeBatch>> {
        Ok(self.state.read().await.green_batches.clone())
    }

    async fn get_green_batch(&self, id: Uuid) -> AppResult<Option<GreenCoffeeBatch>> {
        let state = self.state.read().await;
        Ok(state.green_batches.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<()> {
        self.state.write().await.green_batches.push(batch.clone());
        Ok(())
    }

    async fn update_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.green_batches.iter_mut().find(|b| b.id == batch.id) {
            Some(existing) => {
                *existing = batch.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_green_batch(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.green_batches, id, |b| b.id))
    }

    async fn list_roasted_batches(&self) -> AppResult<Vec<RoastedCoffeeBatch>> {
        Ok(self.state.read().await.roasted_batches.clone())
    }

    async fn insert_roasted_batch(&self, batch: &RoastedCoffeeBatch) -> AppResult<()> {
        self.state.write().await.roasted_batches.push(batch.clone());
        Ok(())
    }

    async fn delete_roasted_batch(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.roasted_batches, id, |b| b.id))
    }

    async fn list_sales_entries(&self) -> AppResult<Vec<SalesEntry>> {
        Ok(self.state.read().await.sales_entries.clone())
    }

    async fn insert_sales_entry(&self, entry: &SalesEntry) -> AppResult<()> {
        self.state.write().await.sales_entries.push(entry.clone());
        Ok(())
    }

    async fn delete_sales_entry(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.sales_entries, id, |e| e.id))
    }

    async fn list_cupping_records(&self) -> AppResult<Vec<CuppingRecord>> {
        Ok(self.state.read().await.cupping_records.clone())
    }

    async fn insert_cupping_record(&self, record: &CuppingRecord) -> AppResult<()> {
        self.state.write().await.cupping_records.push(record.clone());
        Ok(())
    }

    async fn delete_cupping_record(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.cupping_records, id, |r| r.id))
    }

    async fn get_thresholds(&self) -> AppResult<ThresholdPolicy> {
        Ok(self.state.read().await.thresholds.clone())
    }

    async fn save_thresholds(&self, policy: &ThresholdPolicy) -> AppResult<()> {
        self.state.write().await.thresholds = policy.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    /// Single lock acquisition so the snapshot is consistent
    async fn snapshot(&self) -> AppResult<InventorySnapshot> {
        Ok(self.state.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use shared::{SalesEntryInput, ThresholdEntry};

    fn sale(product: &str) -> SalesEntry {
        SalesEntryInput {
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            product_name: product.to_string(),
            mapped_variety: Some("Santos".to_string()),
            quantity: 3.0,
            notes: None,
        }
        .into_entry(Uuid::new_v4(), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_list_delete_keeps_order() {
        let repo = MemoryInventoryRepository::new();
        let first = sale("Santos 12oz");
        let second = sale("Santos 5kg");
        repo.insert_sales_entry(&first).await.unwrap();
        repo.insert_sales_entry(&second).await.unwrap();

        let entries = repo.list_sales_entries().await.unwrap();
        assert_eq!(entries, vec![first.clone(), second.clone()]);

        assert!(repo.delete_sales_entry(first.id).await.unwrap());
        assert!(!repo.delete_sales_entry(first.id).await.unwrap());
        assert_eq!(repo.list_sales_entries().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_thresholds_round_trip_through_snapshot() {
        let repo = MemoryInventoryRepository::new();
        let mut policy = ThresholdPolicy::default();
        policy
            .set_specific(ThresholdEntry {
                variety: "Santos".to_string(),
                warehouse: "Main".to_string(),
                low_threshold: 4.0,
                critical_threshold: None,
            })
            .unwrap();
        repo.save_thresholds(&policy).await.unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        assert_eq!(snapshot.thresholds, policy);
    }
}
