//! Inventory safety and forecasting settings

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_not_blank;

/// Low-stock threshold configuration
///
/// The three strategies all resolve to a single [`ResolvedThreshold`] per
/// (variety, warehouse) pair, so alerting runs through one code path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// One threshold for every pair; severity comes from the stock/threshold ratio
    SingleDefault { threshold: f64 },
    /// Explicit critical and low tiers shared by every pair
    TwoTier {
        critical_threshold: f64,
        low_threshold: f64,
    },
    /// Per-pair entries, then the per-variety default, then the per-warehouse default
    SpecificWithFallback {
        #[serde(default)]
        thresholds: Vec<ThresholdEntry>,
        default_per_variety: Option<f64>,
        default_per_warehouse: Option<f64>,
    },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::SpecificWithFallback {
            thresholds: Vec::new(),
            default_per_variety: None,
            default_per_warehouse: None,
        }
    }
}

/// A threshold configured for one (variety, warehouse) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ThresholdEntry {
    #[validate(custom = "validate_not_blank")]
    pub variety: String,
    #[validate(custom = "validate_not_blank")]
    pub warehouse: String,
    #[validate(range(min = 0.0))]
    pub low_threshold: f64,
    /// When present the entry uses two-tier severity instead of the ratio rule
    #[validate(range(min = 0.0))]
    pub critical_threshold: Option<f64>,
}

/// Where an effective threshold came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Global,
    Specific,
    VarietyDefault,
    WarehouseDefault,
}

/// The threshold in force for one (variety, warehouse) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResolvedThreshold {
    pub low: f64,
    pub critical: Option<f64>,
    pub source: ThresholdSource,
}

impl ThresholdPolicy {
    /// Resolve the effective threshold for a pair, if any is configured
    pub fn resolve(&self, variety: &str, warehouse: &str) -> Option<ResolvedThreshold> {
        match self {
            ThresholdPolicy::SingleDefault { threshold } => Some(ResolvedThreshold {
                low: *threshold,
                critical: None,
                source: ThresholdSource::Global,
            }),
            ThresholdPolicy::TwoTier {
                critical_threshold,
                low_threshold,
            } => Some(ResolvedThreshold {
                low: *low_threshold,
                critical: Some(*critical_threshold),
                source: ThresholdSource::Global,
            }),
            ThresholdPolicy::SpecificWithFallback {
                thresholds,
                default_per_variety,
                default_per_warehouse,
            } => {
                if let Some(entry) = thresholds
                    .iter()
                    .find(|t| t.variety == variety && t.warehouse == warehouse)
                {
                    return Some(ResolvedThreshold {
                        low: entry.low_threshold,
                        critical: entry.critical_threshold,
                        source: ThresholdSource::Specific,
                    });
                }

                default_per_variety
                    .map(|low| ResolvedThreshold {
                        low,
                        critical: None,
                        source: ThresholdSource::VarietyDefault,
                    })
                    .or_else(|| {
                        default_per_warehouse.map(|low| ResolvedThreshold {
                            low,
                            critical: None,
                            source: ThresholdSource::WarehouseDefault,
                        })
                    })
            }
        }
    }

    /// Insert or replace the entry for a (variety, warehouse) pair
    pub fn set_specific(&mut self, entry: ThresholdEntry) -> Result<(), &'static str> {
        match self {
            ThresholdPolicy::SpecificWithFallback { thresholds, .. } => {
                match thresholds
                    .iter_mut()
                    .find(|t| t.variety == entry.variety && t.warehouse == entry.warehouse)
                {
                    Some(existing) => *existing = entry,
                    None => thresholds.push(entry),
                }
                Ok(())
            }
            _ => Err("Specific thresholds require the specific_with_fallback strategy"),
        }
    }

    /// Remove the entry for a pair; returns whether anything was removed
    pub fn remove_specific(&mut self, variety: &str, warehouse: &str) -> bool {
        match self {
            ThresholdPolicy::SpecificWithFallback { thresholds, .. } => {
                let before = thresholds.len();
                thresholds.retain(|t| !(t.variety == variety && t.warehouse == warehouse));
                thresholds.len() != before
            }
            _ => false,
        }
    }
}

/// Tunables for the forecasting engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSettings {
    /// Trailing window used when estimating usage rates
    pub analysis_window_weeks: u32,
    /// Desired stock expressed in weeks of usage
    pub target_weeks_of_cover: f64,
    pub lead_time_weeks: f64,
    pub safety_stock_weeks: f64,
    /// Number of rows shown in the depletion forecast summary
    pub summary_limit: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            analysis_window_weeks: 12,
            target_weeks_of_cover: 6.0,
            lead_time_weeks: 4.0,
            safety_stock_weeks: 2.0,
            summary_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(variety: &str, warehouse: &str, low: f64, critical: Option<f64>) -> ThresholdEntry {
        ThresholdEntry {
            variety: variety.to_string(),
            warehouse: warehouse.to_string(),
            low_threshold: low,
            critical_threshold: critical,
        }
    }

    #[test]
    fn test_resolution_order() {
        let policy = ThresholdPolicy::SpecificWithFallback {
            thresholds: vec![entry("Yirgacheffe", "Main", 8.0, Some(3.0))],
            default_per_variety: Some(5.0),
            default_per_warehouse: Some(2.0),
        };

        let specific = policy.resolve("Yirgacheffe", "Main").unwrap();
        assert_eq!(specific.source, ThresholdSource::Specific);
        assert_eq!(specific.low, 8.0);
        assert_eq!(specific.critical, Some(3.0));

        let variety_default = policy.resolve("Yirgacheffe", "Annex").unwrap();
        assert_eq!(variety_default.source, ThresholdSource::VarietyDefault);
        assert_eq!(variety_default.low, 5.0);
    }

    #[test]
    fn test_warehouse_default_used_last() {
        let policy = ThresholdPolicy::SpecificWithFallback {
            thresholds: vec![],
            default_per_variety: None,
            default_per_warehouse: Some(2.0),
        };
        let resolved = policy.resolve("Sidamo", "Main").unwrap();
        assert_eq!(resolved.source, ThresholdSource::WarehouseDefault);
        assert_eq!(resolved.low, 2.0);
    }

    #[test]
    fn test_no_threshold_configured() {
        assert!(ThresholdPolicy::default().resolve("Sidamo", "Main").is_none());
    }

    #[test]
    fn test_set_and_remove_specific() {
        let mut policy = ThresholdPolicy::default();
        policy.set_specific(entry("Huila", "Main", 4.0, None)).unwrap();
        policy.set_specific(entry("Huila", "Main", 6.0, Some(2.0))).unwrap();

        let resolved = policy.resolve("Huila", "Main").unwrap();
        assert_eq!(resolved.low, 6.0);
        assert_eq!(resolved.critical, Some(2.0));

        assert!(policy.remove_specific("Huila", "Main"));
        assert!(!policy.remove_specific("Huila", "Main"));
        assert!(policy.resolve("Huila", "Main").is_none());
    }

    #[test]
    fn test_set_specific_rejected_for_global_policies() {
        let mut policy = ThresholdPolicy::SingleDefault { threshold: 5.0 };
        assert!(policy.set_specific(entry("Huila", "Main", 4.0, None)).is_err());
    }

    #[test]
    fn test_policy_json_shape() {
        let json = r#"{"strategy":"two_tier","critical_threshold":3,"low_threshold":5}"#;
        let policy: ThresholdPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy,
            ThresholdPolicy::TwoTier {
                critical_threshold: 3.0,
                low_threshold: 5.0
            }
        );
    }
}
