//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Weight units used for bag sizes and prices
///
/// Anything that is not one of the four known units deserializes to
/// [`WeightUnit::Unknown`] instead of failing, so a malformed record never
/// takes a dashboard down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    #[default]
    Lb,
    G,
    Oz,
    #[serde(other)]
    Unknown,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
            WeightUnit::G => "g",
            WeightUnit::Oz => "oz",
            WeightUnit::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "kg" => WeightUnit::Kg,
            "lb" | "lbs" => WeightUnit::Lb,
            "g" => WeightUnit::G,
            "oz" => WeightUnit::Oz,
            _ => WeightUnit::Unknown,
        })
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which inventory collection a batch belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    #[default]
    Green,
    Roasted,
}

impl InventoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryKind::Green => "green",
            InventoryKind::Roasted => "roasted",
        }
    }
}

/// Case-insensitive variety comparison used by the usage estimator
pub fn same_variety(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
