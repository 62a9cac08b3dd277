//! HTTP handlers for green and roasted coffee inventory

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{GreenBatchInput, GreenCoffeeBatch, RoastedBatchInput, RoastedCoffeeBatch};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::InventoryService;
use crate::AppState;

/// List green coffee batches
pub async fn list_green_batches(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GreenCoffeeBatch>>> {
    let service = InventoryService::new(state.repo);
    let batches = service.list_green_batches().await?;
    Ok(Json(batches))
}

/// Record a green coffee batch
pub async fn create_green_batch(
    State(state): State<AppState>,
    Json(input): Json<GreenBatchInput>,
) -> AppResult<(StatusCode, Json<GreenCoffeeBatch>)> {
    let service = InventoryService::new(state.repo);
    let batch = service.create_green_batch(input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// Get a green coffee batch
pub async fn get_green_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<GreenCoffeeBatch>> {
    let service = InventoryService::new(state.repo);
    let batch = service.get_green_batch(batch_id).await?;
    Ok(Json(batch))
}

/// Replace a green coffee batch
pub async fn update_green_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<GreenBatchInput>,
) -> AppResult<Json<GreenCoffeeBatch>> {
    let service = InventoryService::new(state.repo);
    let batch = service.update_green_batch(batch_id, input).await?;
    Ok(Json(batch))
}

/// Delete a green coffee batch
pub async fn delete_green_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.repo);
    service.delete_green_batch(batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List roasted coffee batches
pub async fn list_roasted_batches(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoastedCoffeeBatch>>> {
    let service = InventoryService::new(state.repo);
    let batches = service.list_roasted_batches().await?;
    Ok(Json(batches))
}

/// Record a roasting run
pub async fn create_roasted_batch(
    State(state): State<AppState>,
    Json(input): Json<RoastedBatchInput>,
) -> AppResult<(StatusCode, Json<RoastedCoffeeBatch>)> {
    let service = InventoryService::new(state.repo);
    let batch = service.create_roasted_batch(input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// Delete a roasted coffee batch
pub async fn delete_roasted_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.repo);
    service.delete_roasted_batch(batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
