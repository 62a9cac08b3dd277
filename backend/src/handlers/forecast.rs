//! HTTP handlers for forecasting, reorder reports and the dashboard

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{
    reorder_csv_filename, Dashboard, DepletionForecast, InventoryKind, LowStockAlert,
    ReorderPoint,
};

use crate::error::AppResult;
use crate::services::ForecastService;
use crate::AppState;

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub inventory: Option<InventoryKind>,
}

/// Reference time for a forecast; defaults to the request time
#[derive(Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ReorderQuery {
    pub target_weeks_of_cover: Option<f64>,
    pub as_of: Option<DateTime<Utc>>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct ReorderPointsQuery {
    pub lead_time_weeks: Option<f64>,
    pub safety_stock_weeks: Option<f64>,
    pub as_of: Option<DateTime<Utc>>,
}

fn forecast_service(state: AppState) -> ForecastService {
    ForecastService::new(state.repo, state.config.forecast.clone())
}

/// Low-stock alerts (`?inventory=green|roasted`)
pub async fn get_low_stock_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<Vec<LowStockAlert>>> {
    let service = forecast_service(state);
    let alerts = service
        .low_stock_alerts(query.inventory.unwrap_or_default())
        .await?;
    Ok(Json(alerts))
}

/// Varieties forecast to run out soonest
pub async fn get_depletion_summary(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<Vec<DepletionForecast>>> {
    let service = forecast_service(state);
    let now = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(service.depletion_summary(now).await?))
}

/// Reorder recommendations as JSON or a CSV download
pub async fn get_reorder_recommendations(
    State(state): State<AppState>,
    Query(query): Query<ReorderQuery>,
) -> AppResult<Response> {
    let service = forecast_service(state);
    let now = query.as_of.unwrap_or_else(Utc::now);

    if query.format.as_deref() == Some("csv") {
        let csv = service.reorder_csv(query.target_weeks_of_cover, now).await?;
        let disposition = format!(
            "attachment; filename=\"{}\"",
            reorder_csv_filename(now.date_naive())
        );
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        let recommendations = service
            .reorder_recommendations(query.target_weeks_of_cover, now)
            .await?;
        Ok(Json(recommendations).into_response())
    }
}

/// Reorder point per variety
pub async fn get_reorder_points(
    State(state): State<AppState>,
    Query(query): Query<ReorderPointsQuery>,
) -> AppResult<Json<Vec<ReorderPoint>>> {
    let service = forecast_service(state);
    let now = query.as_of.unwrap_or_else(Utc::now);
    let points = service
        .reorder_points(query.lead_time_weeks, query.safety_stock_weeks, now)
        .await?;
    Ok(Json(points))
}

/// Quick stats, alerts and depletion summary in one payload
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<Dashboard>> {
    let service = forecast_service(state);
    let now = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(service.dashboard(now).await?))
}
