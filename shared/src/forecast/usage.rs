//! Usage-rate estimation from roasting and sales history

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{RoastedCoffeeBatch, SalesEntry};
use crate::types::same_variety;

pub const DEFAULT_ANALYSIS_WINDOW_WEEKS: u32 = 12;
/// Longer than chrono's whole date range, so larger windows change nothing
pub const MAX_ANALYSIS_WINDOW_WEEKS: u32 = 28_000_000;

/// A historical consumption data point
pub trait UsageRecord {
    /// Variety the usage counts against; `None` for unmapped records
    fn usage_variety(&self) -> Option<&str>;
    fn usage_date(&self) -> NaiveDate;
    fn usage_quantity(&self) -> f64;
}

impl UsageRecord for RoastedCoffeeBatch {
    fn usage_variety(&self) -> Option<&str> {
        Some(&self.variety)
    }

    fn usage_date(&self) -> NaiveDate {
        self.roast_date
    }

    fn usage_quantity(&self) -> f64 {
        f64::from(self.quantity_bags)
    }
}

impl UsageRecord for SalesEntry {
    fn usage_variety(&self) -> Option<&str> {
        self.mapped_variety.as_deref()
    }

    fn usage_date(&self) -> NaiveDate {
        self.date
    }

    fn usage_quantity(&self) -> f64 {
        self.quantity
    }
}

/// Estimated consumption for one variety
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UsageEstimate {
    pub variety: String,
    pub rate_per_week: f64,
}

/// Bags per week consumed by `variety` over the trailing window ending at `now`
///
/// Records spread over several days are divided by their own span (at least
/// one week). A single day of activity is spread over the whole window so
/// that one busy day does not read as a runaway rate.
pub fn estimate_rate<R: UsageRecord>(
    variety: &str,
    records: &[R],
    analysis_window_weeks: u32,
    now: DateTime<Utc>,
) -> f64 {
    let window_weeks = analysis_window_weeks.clamp(1, MAX_ANALYSIS_WINDOW_WEEKS);
    // A window reaching past the earliest representable date has no cutoff
    let cutoff = Duration::try_weeks(i64::from(window_weeks))
        .and_then(|window| now.checked_sub_signed(window))
        .map_or(NaiveDate::MIN, |start| start.date_naive());

    let mut total = 0.0;
    let mut dates = BTreeSet::new();
    for record in records {
        let Some(record_variety) = record.usage_variety() else {
            continue;
        };
        let quantity = record.usage_quantity();
        if !quantity.is_finite()
            || !same_variety(record_variety, variety)
            || record.usage_date() < cutoff
        {
            continue;
        }
        total += quantity;
        dates.insert(record.usage_date());
    }

    let rate = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if dates.len() >= 2 => {
            let span_weeks = ((*last - *first).num_days() as f64 / 7.0).max(1.0);
            total / span_weeks
        }
        (Some(_), _) => total / f64::from(window_weeks),
        _ => 0.0,
    };

    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

/// Combined usage rate for a variety
///
/// Roasting and sales are independent signals; the faster one wins.
pub fn estimate_usage_rate(
    variety: &str,
    roasted_batches: &[RoastedCoffeeBatch],
    sales_entries: &[SalesEntry],
    analysis_window_weeks: u32,
    now: DateTime<Utc>,
) -> UsageEstimate {
    let roasting_rate = estimate_rate(variety, roasted_batches, analysis_window_weeks, now);
    let sales_rate = estimate_rate(variety, sales_entries, analysis_window_weeks, now);

    UsageEstimate {
        variety: variety.to_string(),
        rate_per_week: roasting_rate.max(sales_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Usage {
        variety: Option<&'static str>,
        date: NaiveDate,
        quantity: f64,
    }

    impl UsageRecord for Usage {
        fn usage_variety(&self) -> Option<&str> {
            self.variety
        }

        fn usage_date(&self) -> NaiveDate {
            self.date
        }

        fn usage_quantity(&self) -> f64 {
            self.quantity
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usage(variety: &'static str, date: NaiveDate, quantity: f64) -> Usage {
        Usage {
            variety: Some(variety),
            date,
            quantity,
        }
    }

    #[test]
    fn test_no_records_is_zero() {
        let records: Vec<Usage> = vec![];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 0.0);
    }

    #[test]
    fn test_rate_over_span() {
        // 30 bags over exactly 3 weeks
        let records = vec![
            usage("Yirgacheffe", day(2024, 5, 1), 10.0),
            usage("Yirgacheffe", day(2024, 5, 8), 10.0),
            usage("Yirgacheffe", day(2024, 5, 22), 10.0),
        ];
        let rate = estimate_rate("Yirgacheffe", &records, 12, now());
        assert!((rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_span_floored_at_one_week() {
        let records = vec![
            usage("Yirgacheffe", day(2024, 5, 20), 4.0),
            usage("Yirgacheffe", day(2024, 5, 22), 4.0),
        ];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 8.0);
    }

    #[test]
    fn test_single_date_spread_over_window() {
        let records = vec![
            usage("Yirgacheffe", day(2024, 5, 20), 6.0),
            usage("Yirgacheffe", day(2024, 5, 20), 6.0),
        ];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 1.0);
    }

    #[test]
    fn test_variety_match_is_case_insensitive() {
        let records = vec![usage("yirgacheffe", day(2024, 5, 20), 12.0)];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 1.0);
    }

    #[test]
    fn test_records_before_window_ignored() {
        let records = vec![
            usage("Yirgacheffe", day(2023, 1, 1), 500.0),
            usage("Yirgacheffe", day(2024, 5, 20), 12.0),
        ];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 1.0);
    }

    #[test]
    fn test_unmapped_and_non_finite_records_ignored() {
        let records = vec![
            Usage {
                variety: None,
                date: day(2024, 5, 20),
                quantity: 50.0,
            },
            usage("Yirgacheffe", day(2024, 5, 21), f64::NAN),
        ];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 12, now()), 0.0);
    }

    #[test]
    fn test_zero_window_treated_as_one_week() {
        let records = vec![usage("Yirgacheffe", day(2024, 5, 30), 3.0)];
        assert_eq!(estimate_rate("Yirgacheffe", &records, 0, now()), 3.0);
    }

    #[test]
    fn test_huge_window_has_no_cutoff() {
        let records = vec![usage("Yirgacheffe", day(2024, 5, 1), 5.0)];
        let rate = estimate_rate("Yirgacheffe", &records, u32::MAX, now());
        assert!(rate > 0.0 && rate.is_finite());
        assert_eq!(rate, 5.0 / f64::from(MAX_ANALYSIS_WINDOW_WEEKS));
    }

    #[test]
    fn test_window_before_earliest_date() {
        let records = vec![
            usage("Yirgacheffe", day(2024, 5, 1), 6.0),
            usage("Yirgacheffe", day(2024, 5, 1), 6.0),
        ];
        let rate = estimate_rate("Yirgacheffe", &records, 12, DateTime::<Utc>::MIN_UTC);
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn test_combined_rate_takes_maximum() {
        let created = now();
        let roasted = vec![RoastedCoffeeBatch {
            id: uuid::Uuid::nil(),
            variety: "Huila".to_string(),
            origin: "Colombia".to_string(),
            rating: Default::default(),
            roast_level: Default::default(),
            format_type: Default::default(),
            quantity_bags: 24,
            warehouse: "Main".to_string(),
            roast_date: day(2024, 5, 25),
            linked_green_batch_id: None,
            cost_per_bag: None,
            notes: None,
            created_at: created,
        }];
        let sales = vec![
            SalesEntry {
                id: uuid::Uuid::nil(),
                date: day(2024, 5, 1),
                product_name: "Huila 12oz".to_string(),
                mapped_variety: Some("huila".to_string()),
                quantity: 9.0,
                notes: None,
                created_at: created,
            },
            SalesEntry {
                id: uuid::Uuid::nil(),
                date: day(2024, 5, 15),
                product_name: "Huila 12oz".to_string(),
                mapped_variety: Some("Huila".to_string()),
                quantity: 9.0,
                notes: None,
                created_at: created,
            },
        ];

        // roasting: 24 / 12 = 2.0, sales: 18 / 2 = 9.0
        let estimate = estimate_usage_rate("Huila", &roasted, &sales, 12, now());
        assert_eq!(estimate.rate_per_week, 9.0);
        assert_eq!(estimate.variety, "Huila");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Day(NaiveDate, f64);

    impl UsageRecord for Day {
        fn usage_variety(&self) -> Option<&str> {
            Some("Sidamo")
        }

        fn usage_date(&self) -> NaiveDate {
            self.0
        }

        fn usage_quantity(&self) -> f64 {
            self.1
        }
    }

    /// Any instant chrono can represent, in whole seconds
    fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
        (DateTime::<Utc>::MIN_UTC.timestamp()..=DateTime::<Utc>::MAX_UTC.timestamp())
            .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Day>> {
        proptest::collection::vec(
            (-400i64..=400i64, -10.0f64..=100.0f64).prop_map(|(offset, qty)| {
                let base = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or(NaiveDate::MIN);
                Day(base + Duration::days(offset), qty)
            }),
            0..10,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The estimate is a finite non-negative number for every window and reference time
        #[test]
        fn prop_rate_total_over_inputs(
            records in records_strategy(),
            window in any::<u32>(),
            now in instant_strategy(),
        ) {
            let rate = estimate_rate("Sidamo", &records, window, now);
            prop_assert!(rate.is_finite());
            prop_assert!(rate >= 0.0);
        }

        /// Widening the window never drops records
        #[test]
        fn prop_wider_window_sees_more(records in records_strategy(), window in 1u32..=60u32) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            let seen = |w: u32| {
                let cutoff = (now - Duration::weeks(i64::from(w))).date_naive();
                records.iter().filter(|r| r.0 >= cutoff && r.1.is_finite()).count()
            };
            prop_assert!(seen(window + 1) >= seen(window));
            let rate = estimate_rate("Sidamo", &records, window, now);
            if seen(window) == 0 {
                prop_assert_eq!(rate, 0.0);
            }
        }
    }
}
