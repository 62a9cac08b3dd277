//! HTTP handlers for sales history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{SalesEntry, SalesEntryInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SalesService;
use crate::AppState;

pub async fn list_sales_entries(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SalesEntry>>> {
    let service = SalesService::new(state.repo);
    Ok(Json(service.list_entries().await?))
}

pub async fn create_sales_entry(
    State(state): State<AppState>,
    Json(input): Json<SalesEntryInput>,
) -> AppResult<(StatusCode, Json<SalesEntry>)> {
    let service = SalesService::new(state.repo);
    let entry = service.record_entry(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_sales_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SalesService::new(state.repo);
    service.delete_entry(entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
