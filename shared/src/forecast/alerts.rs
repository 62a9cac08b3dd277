//! Low-stock alert engine

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ResolvedThreshold, StockBatch, ThresholdPolicy};

/// Ratio of stock to threshold at or below which a single-threshold alert is critical
pub const CRITICAL_RATIO: f64 = 0.5;

/// Alert severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Low,
}

impl AlertSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "Critical",
            AlertSeverity::Low => "Low",
        }
    }
}

/// A (variety, warehouse) pair whose stock is at or below its threshold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockAlert {
    pub variety: String,
    pub warehouse: String,
    pub current_bags: u64,
    /// Stock level that raised the alert
    pub threshold: f64,
    /// Critical tier, when the threshold is two-tier
    pub critical_threshold: Option<f64>,
    pub severity: AlertSeverity,
}

impl LowStockAlert {
    /// Stock as a fraction of the alert threshold
    pub fn ratio(&self) -> f64 {
        self.current_bags as f64 / self.threshold
    }
}

/// How an alert list is ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOrdering {
    /// Ascending stock/threshold ratio
    Ratio,
    /// Critical before low, then ascending absolute stock
    SeverityThenStock,
    /// Critical before low, then ascending ratio
    SeverityThenRatio,
}

impl ThresholdPolicy {
    pub fn alert_ordering(&self) -> AlertOrdering {
        match self {
            ThresholdPolicy::SingleDefault { .. } => AlertOrdering::Ratio,
            ThresholdPolicy::TwoTier { .. } => AlertOrdering::SeverityThenStock,
            ThresholdPolicy::SpecificWithFallback { .. } => AlertOrdering::SeverityThenRatio,
        }
    }
}

fn usable(level: f64) -> bool {
    level.is_finite() && level >= 0.0
}

impl ResolvedThreshold {
    /// Critical tier, if it is a usable number
    fn critical_tier(&self) -> Option<f64> {
        self.critical.filter(|c| usable(*c))
    }

    /// Stock level at or below which an alert is raised; `None` disables alerts
    pub fn alert_level(&self) -> Option<f64> {
        let low = if usable(self.low) { self.low } else { 0.0 };
        let level = self.critical_tier().map_or(low, |c| c.max(low));
        (level > 0.0).then_some(level)
    }

    /// Classify `current_bags` against this threshold
    pub fn classify(&self, current_bags: u64) -> Option<AlertSeverity> {
        let level = self.alert_level()?;
        let current = current_bags as f64;
        if current > level {
            return None;
        }

        let severity = match self.critical_tier() {
            Some(critical) if current <= critical => AlertSeverity::Critical,
            Some(_) => AlertSeverity::Low,
            None if current / level <= CRITICAL_RATIO => AlertSeverity::Critical,
            None => AlertSeverity::Low,
        };
        Some(severity)
    }
}

/// Total bags per (variety, warehouse)
pub fn aggregate_stock<'a, B, I>(batches: I) -> BTreeMap<(String, String), u64>
where
    B: StockBatch + ?Sized + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut totals = BTreeMap::new();
    for batch in batches {
        *totals
            .entry((batch.variety().to_string(), batch.warehouse().to_string()))
            .or_insert(0u64) += u64::from(batch.quantity_bags());
    }
    totals
}

/// Low-stock alerts for every (variety, warehouse) pair, most urgent first
pub fn low_stock_alerts<'a, B, I>(batches: I, policy: &ThresholdPolicy) -> Vec<LowStockAlert>
where
    B: StockBatch + ?Sized + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut alerts: Vec<LowStockAlert> = aggregate_stock(batches)
        .into_iter()
        .filter_map(|((variety, warehouse), current_bags)| {
            let resolved = policy.resolve(&variety, &warehouse)?;
            let severity = resolved.classify(current_bags)?;
            Some(LowStockAlert {
                threshold: resolved.alert_level()?,
                critical_threshold: resolved.critical_tier(),
                variety,
                warehouse,
                current_bags,
                severity,
            })
        })
        .collect();

    sort_alerts(&mut alerts, policy.alert_ordering());
    alerts
}

fn sort_alerts(alerts: &mut [LowStockAlert], ordering: AlertOrdering) {
    let by_ratio = |a: &LowStockAlert, b: &LowStockAlert| {
        a.ratio().partial_cmp(&b.ratio()).unwrap_or(Ordering::Equal)
    };

    alerts.sort_by(|a, b| match ordering {
        AlertOrdering::Ratio => by_ratio(a, b),
        AlertOrdering::SeverityThenStock => a
            .severity
            .cmp(&b.severity)
            .then(a.current_bags.cmp(&b.current_bags)),
        AlertOrdering::SeverityThenRatio => a.severity.cmp(&b.severity).then_with(|| by_ratio(a, b)),
    });
}

/// Badge shown next to an alert on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertUrgency {
    Critical,
    Warning,
}

pub fn alert_urgency(alert: &LowStockAlert) -> AlertUrgency {
    match alert.severity {
        AlertSeverity::Critical => AlertUrgency::Critical,
        AlertSeverity::Low => AlertUrgency::Warning,
    }
}

/// Effective threshold for a pair under `policy`
pub fn resolve_threshold(
    policy: &ThresholdPolicy,
    variety: &str,
    warehouse: &str,
) -> Option<ResolvedThreshold> {
    policy.resolve(variety, warehouse)
}

/// Whether a single batch is at or below its threshold on its own
pub fn is_low_stock<B: StockBatch + ?Sized>(batch: &B, policy: &ThresholdPolicy) -> bool {
    resolve_threshold(policy, batch.variety(), batch.warehouse())
        .is_some_and(|t| t.low > 0.0 && f64::from(batch.quantity_bags()) <= t.low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThresholdEntry;

    struct Lot(&'static str, &'static str, u32);

    impl StockBatch for Lot {
        fn variety(&self) -> &str {
            self.0
        }

        fn warehouse(&self) -> &str {
            self.1
        }

        fn quantity_bags(&self) -> u32 {
            self.2
        }
    }

    fn two_tier() -> ThresholdPolicy {
        ThresholdPolicy::TwoTier {
            critical_threshold: 3.0,
            low_threshold: 5.0,
        }
    }

    #[test]
    fn test_two_tier_critical() {
        let alerts = low_stock_alerts(&[Lot("Yirgacheffe", "Main", 2)], &two_tier());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[0].current_bags, 2);
        assert_eq!(alerts[0].threshold, 5.0);
        assert_eq!(alerts[0].critical_threshold, Some(3.0));
    }

    #[test]
    fn test_two_tier_low() {
        let alerts = low_stock_alerts(&[Lot("Yirgacheffe", "Main", 4)], &two_tier());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_above_threshold_no_alert() {
        assert!(low_stock_alerts(&[Lot("Yirgacheffe", "Main", 6)], &two_tier()).is_empty());
    }

    #[test]
    fn test_stock_aggregated_per_pair() {
        let batches = [
            Lot("Yirgacheffe", "Main", 2),
            Lot("Yirgacheffe", "Main", 2),
            Lot("Yirgacheffe", "Annex", 1),
        ];
        let policy = ThresholdPolicy::SingleDefault { threshold: 4.0 };
        let alerts = low_stock_alerts(&batches, &policy);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].warehouse, "Annex");
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[1].warehouse, "Main");
        assert_eq!(alerts[1].current_bags, 4);
        assert_eq!(alerts[1].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_ratio_severity_boundary() {
        let policy = ThresholdPolicy::SingleDefault { threshold: 10.0 };
        let alerts = low_stock_alerts(&[Lot("Sidamo", "Main", 5), Lot("Huila", "Main", 6)], &policy);
        assert_eq!(alerts[0].variety, "Sidamo");
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[1].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_no_alert_without_positive_threshold() {
        let batches = [Lot("Sidamo", "Main", 0)];
        assert!(low_stock_alerts(&batches, &ThresholdPolicy::default()).is_empty());
        assert!(low_stock_alerts(&batches, &ThresholdPolicy::SingleDefault { threshold: 0.0 }).is_empty());
        assert!(low_stock_alerts(&batches, &ThresholdPolicy::SingleDefault { threshold: -3.0 }).is_empty());
        assert!(low_stock_alerts(&batches, &ThresholdPolicy::SingleDefault { threshold: f64::NAN }).is_empty());
    }

    #[test]
    fn test_specific_zero_does_not_fall_through() {
        let policy = ThresholdPolicy::SpecificWithFallback {
            thresholds: vec![ThresholdEntry {
                variety: "Sidamo".to_string(),
                warehouse: "Main".to_string(),
                low_threshold: 0.0,
                critical_threshold: None,
            }],
            default_per_variety: Some(10.0),
            default_per_warehouse: None,
        };
        assert!(low_stock_alerts(&[Lot("Sidamo", "Main", 1)], &policy).is_empty());
        assert_eq!(low_stock_alerts(&[Lot("Sidamo", "Annex", 1)], &policy).len(), 1);
    }

    #[test]
    fn test_two_tier_ordering_by_severity_then_stock() {
        let policy = ThresholdPolicy::TwoTier {
            critical_threshold: 3.0,
            low_threshold: 8.0,
        };
        let batches = [
            Lot("A", "Main", 7),
            Lot("B", "Main", 3),
            Lot("C", "Main", 5),
            Lot("D", "Main", 1),
        ];
        let order: Vec<_> = low_stock_alerts(&batches, &policy)
            .into_iter()
            .map(|a| a.variety)
            .collect();
        assert_eq!(order, vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_mixed_specific_entries() {
        let policy = ThresholdPolicy::SpecificWithFallback {
            thresholds: vec![ThresholdEntry {
                variety: "Huila".to_string(),
                warehouse: "Main".to_string(),
                low_threshold: 20.0,
                critical_threshold: Some(4.0),
            }],
            default_per_variety: Some(10.0),
            default_per_warehouse: None,
        };
        // Huila: 9/20 is low under its tiers; Sidamo: 4/10 is critical by ratio
        let alerts = low_stock_alerts(&[Lot("Huila", "Main", 9), Lot("Sidamo", "Main", 4)], &policy);
        assert_eq!(alerts[0].variety, "Sidamo");
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[1].variety, "Huila");
        assert_eq!(alerts[1].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_is_low_stock() {
        let policy = ThresholdPolicy::SingleDefault { threshold: 5.0 };
        assert!(is_low_stock(&Lot("Sidamo", "Main", 5), &policy));
        assert!(!is_low_stock(&Lot("Sidamo", "Main", 6), &policy));
        assert!(!is_low_stock(&Lot("Sidamo", "Main", 0), &ThresholdPolicy::default()));
    }

    #[test]
    fn test_alert_urgency_follows_severity() {
        let alerts = low_stock_alerts(
            &[Lot("Sidamo", "Main", 2), Lot("Huila", "Main", 4)],
            &two_tier(),
        );
        assert_eq!(alert_urgency(&alerts[0]), AlertUrgency::Critical);
        assert_eq!(alert_urgency(&alerts[1]), AlertUrgency::Warning);
    }

    #[test]
    fn test_alerts_idempotent() {
        let batches = [Lot("A", "Main", 1), Lot("B", "Annex", 2), Lot("A", "Annex", 3)];
        let policy = two_tier();
        assert_eq!(low_stock_alerts(&batches, &policy), low_stock_alerts(&batches, &policy));
    }
}
