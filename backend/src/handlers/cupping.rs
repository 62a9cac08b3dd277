//! HTTP handlers for cupping records

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CuppingRecord, CuppingRecordInput};
use uuid::Uuid;

use crate::{error::AppResult, services::CuppingService, AppState};

/// List cupping records, best first
pub async fn list_cupping_records(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CuppingRecord>>> {
    let service = CuppingService::new(state.repo);
    let records = service.list_records().await?;
    Ok(Json(records))
}

/// Record a cupping evaluation
pub async fn create_cupping_record(
    State(state): State<AppState>,
    Json(input): Json<CuppingRecordInput>,
) -> AppResult<(StatusCode, Json<CuppingRecord>)> {
    let service = CuppingService::new(state.repo);
    let record = service.record(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_cupping_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CuppingService::new(state.repo);
    service.delete(record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
