//! Reorder recommendations and reorder points

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::depletion::estimate_depletion_date;
use super::units::price_per_pound;
use super::usage::estimate_usage_rate;
use crate::models::{CuppingRecord, ForecastSettings, GreenCoffeeBatch, InventorySnapshot};

pub const DEFAULT_TARGET_WEEKS_OF_COVER: f64 = 6.0;
pub const DEFAULT_LEAD_TIME_WEEKS: f64 = 4.0;
pub const DEFAULT_SAFETY_STOCK_WEEKS: f64 = 2.0;

/// What to buy next for one variety
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderRecommendation {
    pub variety: String,
    pub current_bags: u64,
    pub weekly_usage: f64,
    pub depletion_date: Option<DateTime<Utc>>,
    pub recommended_reorder_qty: u64,
    /// Best cupping score recorded for the variety
    pub top_quality_score: Option<Decimal>,
    /// Mean purchase price per pound across priced green batches
    pub avg_cost_per_pound: Option<f64>,
}

/// Stock level at which a variety should be reordered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderPoint {
    pub variety: String,
    pub current_bags: u64,
    pub weekly_usage: f64,
    pub reorder_point: u64,
    pub below_reorder_point: bool,
}

/// Bags needed to bring `current_bags` up to `target_weeks_of_cover` weeks of usage
pub fn recommended_reorder_qty(current_bags: u64, rate_per_week: f64, target_weeks_of_cover: f64) -> u64 {
    if !rate_per_week.is_finite() || rate_per_week <= 0.0 {
        return 0;
    }
    let target = if target_weeks_of_cover.is_finite() {
        target_weeks_of_cover.max(0.0)
    } else {
        DEFAULT_TARGET_WEEKS_OF_COVER
    };

    let needed = (rate_per_week * target - current_bags as f64).ceil();
    if needed.is_finite() && needed > 0.0 {
        needed as u64
    } else {
        0
    }
}

/// `ceil(rate × (lead + safety))`; zero when there is no usage
pub fn reorder_point(rate_per_week: f64, lead_time_weeks: f64, safety_stock_weeks: f64) -> u64 {
    if !rate_per_week.is_finite() || rate_per_week <= 0.0 {
        return 0;
    }
    let weeks = lead_time_weeks.max(0.0) + safety_stock_weeks.max(0.0);
    let point = (rate_per_week * weeks).ceil();
    if point.is_finite() && point > 0.0 {
        point as u64
    } else {
        0
    }
}

fn top_quality_score(variety: &str, cupping_records: &[CuppingRecord]) -> Option<Decimal> {
    cupping_records
        .iter()
        .filter(|r| r.variety == variety)
        .map(|r| r.score)
        .max()
}

fn avg_cost_per_pound(variety: &str, cost_batches: &[GreenCoffeeBatch]) -> Option<f64> {
    let prices: Vec<f64> = cost_batches
        .iter()
        .filter(|b| b.variety == variety)
        .filter_map(|b| {
            let price = b.price_per_unit?.to_f64()?;
            let per_pound = price_per_pound(price, b.price_unit);
            per_pound.is_finite().then_some(per_pound)
        })
        .collect();

    if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    }
}

/// Soonest depletion first; rows without a forecast go last, biggest order first
fn compare_recommendations(a: &ReorderRecommendation, b: &ReorderRecommendation) -> Ordering {
    match (a.depletion_date, b.depletion_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.recommended_reorder_qty.cmp(&a.recommended_reorder_qty),
    }
}

/// One recommendation per variety, ranked by urgency
///
/// Varieties missing from `stock_by_variety` hold zero bags; varieties
/// missing from `usage_rates` have no usage.
pub fn compute_reorder_recommendations(
    varieties: &BTreeSet<String>,
    stock_by_variety: &BTreeMap<String, u64>,
    usage_rates: &BTreeMap<String, f64>,
    target_weeks_of_cover: f64,
    cupping_records: &[CuppingRecord],
    cost_batches: &[GreenCoffeeBatch],
    now: DateTime<Utc>,
) -> Vec<ReorderRecommendation> {
    let mut recommendations: Vec<ReorderRecommendation> = varieties
        .iter()
        .map(|variety| {
            let current_bags = stock_by_variety.get(variety).copied().unwrap_or(0);
            let weekly_usage = usage_rates
                .get(variety)
                .copied()
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(0.0);

            ReorderRecommendation {
                variety: variety.clone(),
                current_bags,
                weekly_usage,
                depletion_date: estimate_depletion_date(current_bags as f64, weekly_usage, now),
                recommended_reorder_qty: recommended_reorder_qty(
                    current_bags,
                    weekly_usage,
                    target_weeks_of_cover,
                ),
                top_quality_score: top_quality_score(variety, cupping_records),
                avg_cost_per_pound: avg_cost_per_pound(variety, cost_batches),
            }
        })
        .collect();

    recommendations.sort_by(compare_recommendations);
    recommendations
}

/// Every variety seen in green stock, roasting or mapped sales
pub fn variety_universe(snapshot: &InventorySnapshot) -> BTreeSet<String> {
    snapshot
        .green_batches
        .iter()
        .map(|b| b.variety.clone())
        .chain(snapshot.roasted_batches.iter().map(|b| b.variety.clone()))
        .chain(
            snapshot
                .sales_entries
                .iter()
                .filter_map(|e| e.mapped_variety.clone()),
        )
        .collect()
}

/// Green bags on hand per variety
pub fn green_stock_by_variety(batches: &[GreenCoffeeBatch]) -> BTreeMap<String, u64> {
    let mut stock = BTreeMap::new();
    for batch in batches {
        *stock.entry(batch.variety.clone()).or_insert(0u64) += u64::from(batch.quantity_bags);
    }
    stock
}

/// Weekly usage for each variety
pub fn usage_rates(
    snapshot: &InventorySnapshot,
    varieties: &BTreeSet<String>,
    analysis_window_weeks: u32,
    now: DateTime<Utc>,
) -> BTreeMap<String, f64> {
    varieties
        .iter()
        .map(|variety| {
            let estimate = estimate_usage_rate(
                variety,
                &snapshot.roasted_batches,
                &snapshot.sales_entries,
                analysis_window_weeks,
                now,
            );
            (variety.clone(), estimate.rate_per_week)
        })
        .collect()
}

/// Full reorder report for an inventory snapshot
pub fn build_reorder_report(
    snapshot: &InventorySnapshot,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> Vec<ReorderRecommendation> {
    let varieties = variety_universe(snapshot);
    let stock = green_stock_by_variety(&snapshot.green_batches);
    let rates = usage_rates(snapshot, &varieties, settings.analysis_window_weeks, now);

    compute_reorder_recommendations(
        &varieties,
        &stock,
        &rates,
        settings.target_weeks_of_cover,
        &snapshot.cupping_records,
        &snapshot.green_batches,
        now,
    )
}

/// Reorder point for every variety, most exposed first
pub fn build_reorder_points(
    snapshot: &InventorySnapshot,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> Vec<ReorderPoint> {
    let varieties = variety_universe(snapshot);
    let stock = green_stock_by_variety(&snapshot.green_batches);
    let rates = usage_rates(snapshot, &varieties, settings.analysis_window_weeks, now);

    let mut points: Vec<ReorderPoint> = varieties
        .into_iter()
        .map(|variety| {
            let current_bags = stock.get(&variety).copied().unwrap_or(0);
            let weekly_usage = rates.get(&variety).copied().unwrap_or(0.0);
            let point = reorder_point(
                weekly_usage,
                settings.lead_time_weeks,
                settings.safety_stock_weeks,
            );
            ReorderPoint {
                variety,
                current_bags,
                weekly_usage,
                reorder_point: point,
                below_reorder_point: point > 0 && current_bags <= point,
            }
        })
        .collect();

    points.sort_by(|a, b| b.below_reorder_point.cmp(&a.below_reorder_point));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use uuid::Uuid;

    use crate::models::{CoffeeRating, CuppingAttributes, FormatType, RoastLevel, RoastedCoffeeBatch};
    use crate::types::WeightUnit;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn green(variety: &str, bags: u32, price: Option<Decimal>, unit: WeightUnit) -> GreenCoffeeBatch {
        GreenCoffeeBatch {
            id: Uuid::new_v4(),
            variety: variety.to_string(),
            origin: "Ethiopia".to_string(),
            farm: None,
            importer: None,
            warehouse: "Main".to_string(),
            bag_size_value: 60.0,
            bag_size_unit: WeightUnit::Kg,
            quantity_bags: bags,
            rating: CoffeeRating::Aa,
            price_per_unit: price,
            price_unit: unit,
            delivery_cost: None,
            received_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            notes: None,
            created_at: now(),
        }
    }

    fn roasted(variety: &str, bags: u32, days_ago: i64) -> RoastedCoffeeBatch {
        RoastedCoffeeBatch {
            id: Uuid::new_v4(),
            variety: variety.to_string(),
            origin: "Ethiopia".to_string(),
            rating: CoffeeRating::Aa,
            roast_level: RoastLevel::Medium,
            format_type: FormatType::FiveKilo,
            quantity_bags: bags,
            warehouse: "Main".to_string(),
            roast_date: (now() - Duration::days(days_ago)).date_naive(),
            linked_green_batch_id: None,
            cost_per_bag: None,
            notes: None,
            created_at: now(),
        }
    }

    fn cupping(variety: &str, score: Decimal) -> CuppingRecord {
        CuppingRecord {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            variety: variety.to_string(),
            origin: "Ethiopia".to_string(),
            farm: None,
            green_batch_id: None,
            score,
            attributes: CuppingAttributes::default(),
            descriptors: vec![],
            notes: None,
            created_at: now(),
        }
    }

    fn single(variety: &str, bags: u64, rate: f64) -> Vec<ReorderRecommendation> {
        let varieties = BTreeSet::from([variety.to_string()]);
        let stock = BTreeMap::from([(variety.to_string(), bags)]);
        let rates = BTreeMap::from([(variety.to_string(), rate)]);
        compute_reorder_recommendations(&varieties, &stock, &rates, 6.0, &[], &[], now())
    }

    #[test]
    fn test_recommended_quantity() {
        let recs = single("Yirgacheffe", 10, 5.0);
        assert_eq!(recs[0].recommended_reorder_qty, 20);
        assert_eq!(recs[0].depletion_date, Some(now() + Duration::days(14)));
    }

    #[test]
    fn test_well_stocked_variety_needs_nothing() {
        let recs = single("Yirgacheffe", 100, 5.0);
        assert_eq!(recs[0].recommended_reorder_qty, 0);
    }

    #[test]
    fn test_no_usage_means_no_order() {
        let recs = single("Yirgacheffe", 0, 0.0);
        assert_eq!(recs[0].recommended_reorder_qty, 0);
        assert_eq!(recs[0].depletion_date, None);
    }

    #[test]
    fn test_recommended_quantity_rounds_up() {
        assert_eq!(recommended_reorder_qty(3, 1.1, 6.0), 4);
        assert_eq!(recommended_reorder_qty(3, 1.0, f64::NAN), 3);
    }

    #[test]
    fn test_reorder_point() {
        assert_eq!(reorder_point(5.0, 4.0, 2.0), 30);
        assert_eq!(reorder_point(1.2, 4.0, 2.0), 8);
        assert_eq!(reorder_point(0.0, 4.0, 2.0), 0);
        assert_eq!(reorder_point(-3.0, 4.0, 2.0), 0);
    }

    #[test]
    fn test_ranking() {
        let varieties = BTreeSet::from([
            "Huila".to_string(),
            "Sidamo".to_string(),
            "Santos".to_string(),
            "Kona".to_string(),
        ]);
        let stock = BTreeMap::from([
            ("Huila".to_string(), 40),
            ("Sidamo".to_string(), 10),
            ("Kona".to_string(), 5),
        ]);
        // Santos has usage but no stock, Kona has stock but no usage
        let rates = BTreeMap::from([
            ("Huila".to_string(), 4.0),
            ("Sidamo".to_string(), 5.0),
            ("Santos".to_string(), 2.0),
        ]);
        let recs = compute_reorder_recommendations(&varieties, &stock, &rates, 6.0, &[], &[], now());
        let order: Vec<_> = recs.iter().map(|r| r.variety.as_str()).collect();
        assert_eq!(order, vec!["Santos", "Sidamo", "Huila", "Kona"]);
        assert_eq!(recs[0].depletion_date, Some(now()));
    }

    #[test]
    fn test_unforecast_rows_ordered_by_quantity() {
        let a = ReorderRecommendation {
            variety: "A".to_string(),
            current_bags: 0,
            weekly_usage: 0.0,
            depletion_date: None,
            recommended_reorder_qty: 2,
            top_quality_score: None,
            avg_cost_per_pound: None,
        };
        let b = ReorderRecommendation {
            variety: "B".to_string(),
            recommended_reorder_qty: 7,
            ..a.clone()
        };
        assert_eq!(compare_recommendations(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_quality_and_cost_enrichment() {
        let batches = vec![
            green("Sidamo", 5, Some(Decimal::new(880, 2)), WeightUnit::Kg),
            green("Sidamo", 5, Some(Decimal::new(400, 2)), WeightUnit::Lb),
            green("Sidamo", 5, None, WeightUnit::Lb),
        ];
        let cuppings = vec![
            cupping("Sidamo", Decimal::new(865, 1)),
            cupping("Sidamo", Decimal::new(880, 1)),
            cupping("Huila", Decimal::new(910, 1)),
        ];
        let varieties = BTreeSet::from(["Sidamo".to_string()]);
        let recs = compute_reorder_recommendations(
            &varieties,
            &green_stock_by_variety(&batches),
            &BTreeMap::new(),
            6.0,
            &cuppings,
            &batches,
            now(),
        );

        assert_eq!(recs[0].current_bags, 15);
        assert_eq!(recs[0].top_quality_score, Some(Decimal::new(880, 1)));
        // 8.80/kg is ~3.99/lb; mean with 4.00/lb
        let cost = recs[0].avg_cost_per_pound.unwrap();
        assert!((cost - (8.8 / 2.20462 + 4.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_reorder_report_universe() {
        let mut snapshot = InventorySnapshot {
            green_batches: vec![green("Sidamo", 4, None, WeightUnit::Lb)],
            roasted_batches: vec![roasted("Huila", 6, 3), roasted("Huila", 6, 10)],
            ..Default::default()
        };
        snapshot.sales_entries.push(crate::models::SalesEntry {
            id: Uuid::new_v4(),
            date: (now() - Duration::days(2)).date_naive(),
            product_name: "Santos 12oz".to_string(),
            mapped_variety: Some("Santos".to_string()),
            quantity: 3.0,
            notes: None,
            created_at: now(),
        });

        let report = build_reorder_report(&snapshot, &ForecastSettings::default(), now());
        let names: BTreeSet<_> = report.iter().map(|r| r.variety.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["Huila", "Santos", "Sidamo"]));

        let huila = report.iter().find(|r| r.variety == "Huila").unwrap();
        assert_eq!(huila.current_bags, 0);
        assert_eq!(huila.weekly_usage, 12.0);
        assert_eq!(huila.recommended_reorder_qty, 72);
    }

    #[test]
    fn test_build_reorder_points() {
        let snapshot = InventorySnapshot {
            green_batches: vec![green("Huila", 20, None, WeightUnit::Lb), green("Kona", 3, None, WeightUnit::Lb)],
            roasted_batches: vec![roasted("Huila", 7, 1), roasted("Huila", 7, 8)],
            ..Default::default()
        };
        let points = build_reorder_points(&snapshot, &ForecastSettings::default(), now());
        assert_eq!(points[0].variety, "Huila");
        assert_eq!(points[0].reorder_point, 84);
        assert!(points[0].below_reorder_point);
        assert_eq!(points[1].reorder_point, 0);
        assert!(!points[1].below_reorder_point);
    }

    #[test]
    fn test_report_is_idempotent() {
        let snapshot = InventorySnapshot {
            green_batches: vec![green("Huila", 20, Some(Decimal::new(5, 0)), WeightUnit::Lb)],
            roasted_batches: vec![roasted("Huila", 7, 1), roasted("Sidamo", 2, 8)],
            ..Default::default()
        };
        let settings = ForecastSettings::default();
        assert_eq!(
            build_reorder_report(&snapshot, &settings, now()),
            build_reorder_report(&snapshot, &settings, now())
        );
    }
}
