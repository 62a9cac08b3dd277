//! Green and roasted coffee inventory service

use chrono::Utc;
use shared::{GreenBatchInput, GreenCoffeeBatch, RoastedBatchInput, RoastedCoffeeBatch};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::SharedRepository;

/// Inventory service for recording and editing coffee batches
#[derive(Clone)]
pub struct InventoryService {
    repo: SharedRepository,
}

impl InventoryService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    // ===== Green coffee =====

    pub async fn list_green_batches(&self) -> AppResult<Vec<GreenCoffeeBatch>> {
        self.repo.list_green_batches().await
    }

    pub async fn get_green_batch(&self, id: Uuid) -> AppResult<GreenCoffeeBatch> {
        self.repo
            .get_green_batch(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Green batch".to_string()))
    }

    pub async fn create_green_batch(&self, input: GreenBatchInput) -> AppResult<GreenCoffeeBatch> {
        input.validate()?;

        let batch = input.into_batch(Uuid::new_v4(), Utc::now());
        self.repo.insert_green_batch(&batch).await?;

        tracing::info!(
            "Recorded green batch {} ({} bags of {} in {})",
            batch.id,
            batch.quantity_bags,
            batch.variety,
            batch.warehouse
        );
        Ok(batch)
    }

    /// Replace every editable field of a batch, keeping its id and creation time
    pub async fn update_green_batch(
        &self,
        id: Uuid,
        input: GreenBatchInput,
    ) -> AppResult<GreenCoffeeBatch> {
        input.validate()?;

        let existing = self.get_green_batch(id).await?;
        let batch = input.into_batch(id, existing.created_at);
        if !self.repo.update_green_batch(&batch).await? {
            return Err(AppError::NotFound("Green batch".to_string()));
        }

        tracing::debug!("Updated green batch {}", id);
        Ok(batch)
    }

    pub async fn delete_green_batch(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_green_batch(id).await? {
            return Err(AppError::NotFound("Green batch".to_string()));
        }
        tracing::info!("Deleted green batch {}", id);
        Ok(())
    }

    // ===== Roasted coffee =====

    pub async fn list_roasted_batches(&self) -> AppResult<Vec<RoastedCoffeeBatch>> {
        self.repo.list_roasted_batches().await
    }

    pub async fn create_roasted_batch(
        &self,
        input: RoastedBatchInput,
    ) -> AppResult<RoastedCoffeeBatch> {
        input.validate()?;

        if let Some(green_id) = input.linked_green_batch_id {
            if self.repo.get_green_batch(green_id).await?.is_none() {
                return Err(AppError::Validation {
                    field: "linked_green_batch_id".to_string(),
                    message: "Linked green batch does not exist".to_string(),
                });
            }
        }

        let batch = input.into_batch(Uuid::new_v4(), Utc::now());
        self.repo.insert_roasted_batch(&batch).await?;

        tracing::info!(
            "Recorded roasted batch {} ({} bags of {})",
            batch.id,
            batch.quantity_bags,
            batch.variety
        );
        Ok(batch)
    }

    pub async fn delete_roasted_batch(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_roasted_batch(id).await? {
            return Err(AppError::NotFound("Roasted batch".to_string()));
        }
        tracing::info!("Deleted roasted batch {}", id);
        Ok(())
    }
}
