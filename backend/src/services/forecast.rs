//! Forecasting service: alerts, depletion, reorder recommendations
//!
//! Fetches one snapshot from the repository and hands it to the pure
//! forecasting core in `shared::forecast`.

use chrono::{DateTime, Utc};
use shared::{
    build_dashboard, build_reorder_points, build_reorder_report, depletion_summary,
    export_reorder_csv, low_stock_alerts, validate_planning_weeks, validate_target_weeks_of_cover,
    Dashboard, DepletionForecast, ForecastSettings, InventoryKind, LowStockAlert, ReorderPoint,
    ReorderRecommendation,
};

use crate::error::{AppError, AppResult};
use crate::repository::SharedRepository;

#[derive(Clone)]
pub struct ForecastService {
    repo: SharedRepository,
    settings: ForecastSettings,
}

fn parameter(field: &str, check: Result<(), &'static str>) -> AppResult<()> {
    check.map_err(|message| AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    })
}

impl ForecastService {
    pub fn new(repo: SharedRepository, settings: ForecastSettings) -> Self {
        Self { repo, settings }
    }

    /// Low-stock alerts for one inventory collection
    pub async fn low_stock_alerts(
        &self,
        kind: InventoryKind,
    ) -> AppResult<Vec<LowStockAlert>> {
        let snapshot = self.repo.snapshot().await?;
        let alerts = low_stock_alerts(snapshot.stock(kind), &snapshot.thresholds);

        tracing::debug!("{} {} inventory alerts", alerts.len(), kind.as_str());
        Ok(alerts)
    }

    pub async fn depletion_summary(&self, now: DateTime<Utc>) -> AppResult<Vec<DepletionForecast>> {
        let snapshot = self.repo.snapshot().await?;
        Ok(depletion_summary(&snapshot, &self.settings, now))
    }

    pub async fn reorder_recommendations(
        &self,
        target_weeks_of_cover: Option<f64>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ReorderRecommendation>> {
        let mut settings = self.settings.clone();
        if let Some(weeks) = target_weeks_of_cover {
            parameter("target_weeks_of_cover", validate_target_weeks_of_cover(weeks))?;
            settings.target_weeks_of_cover = weeks;
        }

        let snapshot = self.repo.snapshot().await?;
        let recommendations = build_reorder_report(&snapshot, &settings, now);

        tracing::debug!(
            "{} reorder recommendations at {} weeks of cover",
            recommendations.len(),
            settings.target_weeks_of_cover
        );
        Ok(recommendations)
    }

    pub async fn reorder_csv(
        &self,
        target_weeks_of_cover: Option<f64>,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let recommendations = self.reorder_recommendations(target_weeks_of_cover, now).await?;
        Ok(export_reorder_csv(&recommendations)?)
    }

    pub async fn reorder_points(
        &self,
        lead_time_weeks: Option<f64>,
        safety_stock_weeks: Option<f64>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ReorderPoint>> {
        let mut settings = self.settings.clone();
        if let Some(weeks) = lead_time_weeks {
            parameter("lead_time_weeks", validate_planning_weeks(weeks))?;
            settings.lead_time_weeks = weeks;
        }
        if let Some(weeks) = safety_stock_weeks {
            parameter("safety_stock_weeks", validate_planning_weeks(weeks))?;
            settings.safety_stock_weeks = weeks;
        }

        let snapshot = self.repo.snapshot().await?;
        Ok(build_reorder_points(&snapshot, &settings, now))
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> AppResult<Dashboard> {
        let snapshot = self.repo.snapshot().await?;
        let dashboard = build_dashboard(&snapshot, &self.settings, now);

        tracing::debug!(
            "Dashboard: {} alerts, {} depletion rows",
            dashboard.alerts.len(),
            dashboard.depletion_forecast.len()
        );
        Ok(dashboard)
    }
}
