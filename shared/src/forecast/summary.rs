//! Dashboard summaries: depletion forecast and needs-attention list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alerts::{low_stock_alerts, LowStockAlert};
use super::depletion::{
    days_until_depletion, depletion_urgency, estimate_depletion_date, format_depletion_estimate,
    DepletionUrgency,
};
use super::usage::estimate_usage_rate;
use crate::models::{
    ForecastSettings, GreenCoffeeBatch, InventorySnapshot, QuickStats, ThresholdPolicy,
};
use crate::types::InventoryKind;

/// One row of the "depleting soon" widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepletionForecast {
    pub variety: String,
    pub current_bags: u64,
    pub usage_rate_per_week: f64,
    pub depletion_date: DateTime<Utc>,
    /// Low-stock threshold for the variety's first warehouse
    pub threshold: Option<f64>,
    pub days_until_depletion: i64,
    pub urgency: DepletionUrgency,
    pub label: String,
}

/// Green stock per variety with its warehouses in first-seen order
fn green_positions(batches: &[GreenCoffeeBatch]) -> Vec<(String, u64, Vec<String>)> {
    let mut positions: Vec<(String, u64, Vec<String>)> = Vec::new();
    for batch in batches {
        let idx = match positions.iter().position(|(v, _, _)| *v == batch.variety) {
            Some(idx) => idx,
            None => {
                positions.push((batch.variety.clone(), 0, Vec::new()));
                positions.len() - 1
            }
        };
        let (_, bags, warehouses) = &mut positions[idx];
        *bags += u64::from(batch.quantity_bags);
        if !warehouses.contains(&batch.warehouse) {
            warehouses.push(batch.warehouse.clone());
        }
    }
    positions
}

/// Threshold shown beside a forecast row
///
/// Per-pair thresholds only look at the first warehouse and then the
/// per-variety default; warehouse-wide defaults are not variety thresholds.
fn summary_threshold(
    policy: &ThresholdPolicy,
    variety: &str,
    first_warehouse: Option<&str>,
) -> Option<f64> {
    match policy {
        ThresholdPolicy::SpecificWithFallback {
            thresholds,
            default_per_variety,
            ..
        } => first_warehouse
            .and_then(|w| {
                thresholds
                    .iter()
                    .find(|t| t.variety == variety && t.warehouse == w)
            })
            .map(|t| t.low_threshold)
            .or(*default_per_variety),
        _ => first_warehouse
            .and_then(|w| policy.resolve(variety, w))
            .map(|t| t.low),
    }
}

/// Green varieties that are forecast to run out, soonest first, at most `summary_limit` rows
pub fn depletion_summary(
    snapshot: &InventorySnapshot,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> Vec<DepletionForecast> {
    let mut forecasts: Vec<DepletionForecast> = green_positions(&snapshot.green_batches)
        .into_iter()
        .filter_map(|(variety, current_bags, warehouses)| {
            let rate = estimate_usage_rate(
                &variety,
                &snapshot.roasted_batches,
                &snapshot.sales_entries,
                settings.analysis_window_weeks,
                now,
            )
            .rate_per_week;
            let depletion_date = estimate_depletion_date(current_bags as f64, rate, now)?;

            let threshold = summary_threshold(
                &snapshot.thresholds,
                &variety,
                warehouses.first().map(String::as_str),
            );

            Some(DepletionForecast {
                current_bags,
                usage_rate_per_week: rate,
                depletion_date,
                threshold,
                days_until_depletion: days_until_depletion(depletion_date, now),
                urgency: depletion_urgency(Some(depletion_date), now),
                label: format_depletion_estimate(Some(depletion_date), now),
                variety,
            })
        })
        .collect();

    forecasts.sort_by_key(|f| f.days_until_depletion);
    forecasts.truncate(settings.summary_limit);
    forecasts
}

/// Everything the home page shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub quick_stats: QuickStats,
    pub alerts: Vec<LowStockAlert>,
    pub depletion_forecast: Vec<DepletionForecast>,
    pub generated_at: DateTime<Utc>,
}

pub fn build_dashboard(
    snapshot: &InventorySnapshot,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> Dashboard {
    Dashboard {
        quick_stats: snapshot.quick_stats(),
        alerts: low_stock_alerts(snapshot.stock(InventoryKind::Green), &snapshot.thresholds),
        depletion_forecast: depletion_summary(snapshot, settings, now),
        generated_at: now,
    }
}
