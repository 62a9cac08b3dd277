//! Route definitions for the Roastery Inventory Platform

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/green-batches", green_batch_routes())
        .nest("/roasted-batches", roasted_batch_routes())
        .nest("/sales", sales_routes())
        .nest("/cupping", cupping_routes())
        .nest("/settings", settings_routes())
        .nest("/forecast", forecast_routes())
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Green coffee inventory routes
fn green_batch_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_green_batches).post(handlers::create_green_batch),
        )
        .route(
            "/:batch_id",
            get(handlers::get_green_batch)
                .put(handlers::update_green_batch)
                .delete(handlers::delete_green_batch),
        )
}

/// Roasted coffee inventory routes
fn roasted_batch_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_roasted_batches).post(handlers::create_roasted_batch),
        )
        .route("/:batch_id", delete(handlers::delete_roasted_batch))
}

fn sales_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_sales_entries).post(handlers::create_sales_entry),
        )
        .route("/:entry_id", delete(handlers::delete_sales_entry))
}

fn cupping_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_cupping_records).post(handlers::create_cupping_record),
        )
        .route("/:record_id", delete(handlers::delete_cupping_record))
}

/// Inventory safety settings routes
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/thresholds",
            get(handlers::get_thresholds).put(handlers::replace_thresholds),
        )
        .route(
            "/thresholds/:variety/:warehouse",
            put(handlers::set_threshold).delete(handlers::remove_threshold),
        )
}

/// Forecasting and reporting routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(handlers::get_low_stock_alerts))
        .route("/depletion", get(handlers::get_depletion_summary))
        .route("/reorder", get(handlers::get_reorder_recommendations))
        .route("/reorder-points", get(handlers::get_reorder_points))
}
