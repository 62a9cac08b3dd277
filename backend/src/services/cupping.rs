//! Cupping record service

use chrono::Utc;
use shared::{CuppingRecord, CuppingRecordInput};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::SharedRepository;

/// Cupping service for the quality log that feeds reorder scoring
#[derive(Clone)]
pub struct CuppingService {
    repo: SharedRepository,
}

impl CuppingService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    /// Records, highest score first
    pub async fn list_records(&self) -> AppResult<Vec<CuppingRecord>> {
        let mut records = self.repo.list_cupping_records().await?;
        records.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(records)
    }

    pub async fn record(&self, input: CuppingRecordInput) -> AppResult<CuppingRecord> {
        input.validate()?;

        let record = input.into_record(Uuid::new_v4(), Utc::now());
        self.repo.insert_cupping_record(&record).await?;

        tracing::info!(
            "Recorded cupping {} for {} ({}, {})",
            record.id,
            record.variety,
            record.score,
            shared::classify_by_score(record.score)
        );
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete_cupping_record(id).await? {
            return Err(AppError::NotFound("Cupping record".to_string()));
        }
        Ok(())
    }
}
