//! Inventory safety settings: low-stock threshold policy

use serde::Deserialize;
use shared::{ThresholdEntry, ThresholdPolicy};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::SharedRepository;

/// Body for setting one (variety, warehouse) threshold
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdUpdate {
    pub low_threshold: f64,
    pub critical_threshold: Option<f64>,
}

#[derive(Clone)]
pub struct SettingsService {
    repo: SharedRepository,
}

fn check_level(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation {
            field: field.to_string(),
            message: "Threshold must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

/// Reject policies containing negative or non-numeric levels
fn validate_policy(policy: &ThresholdPolicy) -> AppResult<()> {
    match policy {
        ThresholdPolicy::SingleDefault { threshold } => check_level("threshold", *threshold),
        ThresholdPolicy::TwoTier {
            critical_threshold,
            low_threshold,
        } => {
            check_level("critical_threshold", *critical_threshold)?;
            check_level("low_threshold", *low_threshold)
        }
        ThresholdPolicy::SpecificWithFallback {
            thresholds,
            default_per_variety,
            default_per_warehouse,
        } => {
            for entry in thresholds {
                entry.validate()?;
                check_level("low_threshold", entry.low_threshold)?;
                if let Some(critical) = entry.critical_threshold {
                    check_level("critical_threshold", critical)?;
                }
            }
            if let Some(level) = default_per_variety {
                check_level("default_per_variety", *level)?;
            }
            if let Some(level) = default_per_warehouse {
                check_level("default_per_warehouse", *level)?;
            }
            Ok(())
        }
    }
}

impl SettingsService {
    pub fn new(repo: SharedRepository) -> Self {
        Self { repo }
    }

    pub async fn get_thresholds(&self) -> AppResult<ThresholdPolicy> {
        self.repo.get_thresholds().await
    }

    /// Replace the whole policy, including switching strategy
    pub async fn replace_thresholds(&self, policy: ThresholdPolicy) -> AppResult<ThresholdPolicy> {
        validate_policy(&policy)?;
        self.repo.save_thresholds(&policy).await?;
        tracing::info!("Threshold policy replaced: {:?}", policy.alert_ordering());
        Ok(policy)
    }

    /// Upsert the threshold for one (variety, warehouse) pair
    pub async fn set_threshold(
        &self,
        variety: &str,
        warehouse: &str,
        update: ThresholdUpdate,
    ) -> AppResult<ThresholdPolicy> {
        let entry = ThresholdEntry {
            variety: variety.trim().to_string(),
            warehouse: warehouse.trim().to_string(),
            low_threshold: update.low_threshold,
            critical_threshold: update.critical_threshold,
        };
        entry.validate()?;
        check_level("low_threshold", entry.low_threshold)?;
        if let Some(critical) = entry.critical_threshold {
            check_level("critical_threshold", critical)?;
        }

        let mut policy = self.repo.get_thresholds().await?;
        policy
            .set_specific(entry)
            .map_err(|message| AppError::Conflict {
                resource: "strategy".to_string(),
                message: message.to_string(),
            })?;
        self.repo.save_thresholds(&policy).await?;

        tracing::debug!("Threshold set for {} / {}", variety, warehouse);
        Ok(policy)
    }

    pub async fn remove_threshold(&self, variety: &str, warehouse: &str) -> AppResult<ThresholdPolicy> {
        let mut policy = self.repo.get_thresholds().await?;
        if !policy.remove_specific(variety.trim(), warehouse.trim()) {
            return Err(AppError::NotFound(format!(
                "Threshold for {} / {}",
                variety, warehouse
            )));
        }
        self.repo.save_thresholds(&policy).await?;
        Ok(policy)
    }
}
