//! Depletion-date projection

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const MS_PER_WEEK: f64 = 7.0 * MS_PER_DAY;

/// Project when `current_bags` runs out at a constant weekly usage
///
/// Returns `None` for "no forecast": invalid stock, or a rate that is not a
/// positive finite number. Stock that is already gone with a positive rate depletes at
/// `reference` itself.
pub fn estimate_depletion_date(
    current_bags: f64,
    rate_per_week: f64,
    reference: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if current_bags.is_nan() || current_bags < 0.0 {
        return None;
    }
    if !rate_per_week.is_finite() || rate_per_week <= 0.0 {
        return None;
    }
    if current_bags <= 0.0 {
        return Some(reference);
    }

    let ms_until_depletion = (current_bags / rate_per_week) * MS_PER_WEEK;
    if !ms_until_depletion.is_finite() || ms_until_depletion >= i64::MAX as f64 {
        return None;
    }

    reference.checked_add_signed(Duration::milliseconds(ms_until_depletion.round() as i64))
}

/// Whole days from `now` until `depletion_date`, rounded down
pub fn days_until_depletion(depletion_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (depletion_date - now).num_milliseconds() as f64;
    (ms / MS_PER_DAY).floor() as i64
}

/// Dashboard urgency of a projected depletion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DepletionUrgency {
    Critical,
    Warning,
    Normal,
    None,
}

/// Critical inside two weeks (or already past), warning inside a month
pub fn depletion_urgency(
    depletion_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DepletionUrgency {
    let Some(date) = depletion_date else {
        return DepletionUrgency::None;
    };

    let days = (date - now).num_milliseconds() as f64 / MS_PER_DAY;
    if days <= 14.0 {
        DepletionUrgency::Critical
    } else if days <= 30.0 {
        DepletionUrgency::Warning
    } else {
        DepletionUrgency::Normal
    }
}

/// Human-readable time left, as shown on the dashboard
pub fn format_depletion_estimate(
    depletion_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let Some(date) = depletion_date else {
        return "No depletion forecast".to_string();
    };

    let days = days_until_depletion(date, now);
    if days < 0 {
        "Already depleted".to_string()
    } else if days == 0 {
        "Depleting today".to_string()
    } else if days <= 7 {
        format!("{} days", days)
    } else if days <= 30 {
        let weeks = days / 7;
        format!("~{} week{}", weeks, if weeks != 1 { "s" } else { "" })
    } else {
        let months = days / 30;
        format!("~{} month{}", months, if months != 1 { "s" } else { "" })
    }
}
