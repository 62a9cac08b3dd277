//! Sales history service

use chrono::Utc;
use shared::{SalesEntry, SalesEntryInput};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::SharedRepository;

#[derive(Clone)]
pub struct SalesService {
    repo: SharedRepository,
}

impl SalesService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn list_entries(&self) -> AppResult<Vec<SalesEntry>> {
        self.repo.list_sales_entries().await
    }

    pub async fn record_entry(&self, input: SalesEntryInput) -> AppResult<SalesEntry> {
        input.validate()?;
        if !input.quantity.is_finite() {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be a number".to_string(),
            });
        }

        let entry = input.into_entry(Uuid::new_v4(), Utc::now());
        self.repo.insert_sales_entry(&entry).await?;

        if entry.mapped_variety.is_none() {
            tracing::debug!(
                "Sales entry {} for '{}' has no mapped variety",
                entry.id,
                entry.product_name
            );
        }
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_sales_entry(id).await? {
            return Err(AppError::NotFound("Sales entry".to_string()));
        }
        Ok(())
    }
}
