//! WebAssembly module for the Roastery Inventory Platform
//!
//! Lets the browser dashboard recompute forecasts locally:
//! - Unit conversion and depletion projection
//! - Low-stock alerts and reorder recommendations from a cached snapshot
//! - CSV export of the reorder report

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::forecast::*;
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("roastery inventory module loaded"));
}

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn timestamp(ms: f64) -> Result<DateTime<Utc>, String> {
    if !ms.is_finite() {
        return Err("Timestamp must be a finite number".to_string());
    }
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .ok_or_else(|| format!("Timestamp out of range: {}", ms))
}

/// Convert a weight to pounds; `unit` is one of kg, lb, g, oz
#[wasm_bindgen]
pub fn convert_to_pounds(value: f64, unit: &str) -> f64 {
    let unit: WeightUnit = unit.parse().unwrap_or(WeightUnit::Unknown);
    to_pounds(value, unit)
}

/// Depletion time in epoch milliseconds, or `undefined` when there is no forecast
#[wasm_bindgen]
pub fn estimate_depletion_ms(current_bags: f64, rate_per_week: f64, reference_ms: f64) -> Option<f64> {
    let reference = timestamp(reference_ms).ok()?;
    estimate_depletion_date(current_bags, rate_per_week, reference).map(|d| d.timestamp_millis() as f64)
}

/// Human-readable depletion estimate, e.g. "~3 weeks"
#[wasm_bindgen]
pub fn describe_depletion(depletion_ms: f64, now_ms: f64) -> String {
    match (timestamp(depletion_ms), timestamp(now_ms)) {
        (Ok(depletion), Ok(now)) => format_depletion_estimate(Some(depletion), now),
        _ => format_depletion_estimate(None, DateTime::<Utc>::default()),
    }
}

#[wasm_bindgen]
pub fn calculate_reorder_qty(current_bags: u32, rate_per_week: f64, target_weeks_of_cover: f64) -> u32 {
    let qty = recommended_reorder_qty(u64::from(current_bags), rate_per_week, target_weeks_of_cover);
    u32::try_from(qty).unwrap_or(u32::MAX)
}

#[wasm_bindgen]
pub fn calculate_reorder_point(rate_per_week: f64, lead_time_weeks: f64, safety_stock_weeks: f64) -> u32 {
    let point = reorder_point(rate_per_week, lead_time_weeks, safety_stock_weeks);
    u32::try_from(point).unwrap_or(u32::MAX)
}

#[derive(Deserialize)]
struct AlertRequest {
    #[serde(default)]
    inventory: InventoryKind,
    snapshot: InventorySnapshot,
}

fn alerts_json(request_json: &str) -> Result<String, String> {
    let request: AlertRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid alert request JSON: {}", e))?;
    let alerts = low_stock_alerts(
        request.snapshot.stock(request.inventory),
        &request.snapshot.thresholds,
    );
    serde_json::to_string(&alerts).map_err(|e| e.to_string())
}

/// Low-stock alerts for `{"inventory": "green"|"roasted", "snapshot": {...}}`
#[wasm_bindgen]
pub fn compute_low_stock_alerts(request_json: &str) -> Result<String, JsValue> {
    alerts_json(request_json).map_err(to_js_error)
}

#[derive(Deserialize)]
struct ReorderRequest {
    snapshot: InventorySnapshot,
    #[serde(default)]
    settings: ForecastSettings,
}

fn reorder_report(request_json: &str, now_ms: f64) -> Result<Vec<ReorderRecommendation>, String> {
    let request: ReorderRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid reorder request JSON: {}", e))?;
    shared::validation::validate_target_weeks_of_cover(request.settings.target_weeks_of_cover)?;
    Ok(build_reorder_report(
        &request.snapshot,
        &request.settings,
        timestamp(now_ms)?,
    ))
}

/// Reorder recommendations as JSON for `{"snapshot": {...}, "settings": {...}}`
#[wasm_bindgen]
pub fn compute_reorder_recommendations_json(request_json: &str, now_ms: f64) -> Result<String, JsValue> {
    reorder_report(request_json, now_ms)
        .and_then(|report| serde_json::to_string(&report).map_err(|e| e.to_string()))
        .map_err(to_js_error)
}

/// Reorder recommendations rendered as a CSV document
#[wasm_bindgen]
pub fn export_reorder_recommendations_csv(request_json: &str, now_ms: f64) -> Result<String, JsValue> {
    reorder_report(request_json, now_ms)
        .and_then(|report| export_reorder_csv(&report).map_err(|e| e.to_string()))
        .map_err(to_js_error)
}

/// Classify coffee by cupping score
#[wasm_bindgen]
pub fn classify_by_cupping_score(score: f64) -> String {
    let decimal_score = Decimal::try_from(score).unwrap_or(Decimal::ZERO);
    classify_by_score(decimal_score).to_string()
}
