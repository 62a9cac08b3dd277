//! HTTP handlers for inventory safety settings

use axum::{
    extract::{Path, State},
    Json,
};
use shared::ThresholdPolicy;

use crate::error::AppResult;
use crate::services::{SettingsService, ThresholdUpdate};
use crate::AppState;

/// Get the low-stock threshold policy
pub async fn get_thresholds(State(state): State<AppState>) -> AppResult<Json<ThresholdPolicy>> {
    let service = SettingsService::new(state.repo);
    Ok(Json(service.get_thresholds().await?))
}

/// Replace the low-stock threshold policy
pub async fn replace_thresholds(
    State(state): State<AppState>,
    Json(policy): Json<ThresholdPolicy>,
) -> AppResult<Json<ThresholdPolicy>> {
    let service = SettingsService::new(state.repo);
    Ok(Json(service.replace_thresholds(policy).await?))
}

/// Set the threshold for one variety in one warehouse
pub async fn set_threshold(
    State(state): State<AppState>,
    Path((variety, warehouse)): Path<(String, String)>,
    Json(update): Json<ThresholdUpdate>,
) -> AppResult<Json<ThresholdPolicy>> {
    let service = SettingsService::new(state.repo);
    let policy = service.set_threshold(&variety, &warehouse, update).await?;
    Ok(Json(policy))
}

/// Remove the threshold for one variety in one warehouse
pub async fn remove_threshold(
    State(state): State<AppState>,
    Path((variety, warehouse)): Path<(String, String)>,
) -> AppResult<Json<ThresholdPolicy>> {
    let service = SettingsService::new(state.repo);
    let policy = service.remove_threshold(&variety, &warehouse).await?;
    Ok(Json(policy))
}
