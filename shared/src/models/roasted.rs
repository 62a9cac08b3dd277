//! Roasted coffee models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::CoffeeRating;
use crate::validation::{validate_non_negative_decimal, validate_not_blank};

/// Roast levels offered by the roastery
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RoastLevel {
    Light,
    #[default]
    Medium,
    Dark,
    Espresso,
}

impl RoastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "Light",
            RoastLevel::Medium => "Medium",
            RoastLevel::Dark => "Dark",
            RoastLevel::Espresso => "Espresso",
        }
    }
}

impl std::fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoastLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(RoastLevel::Light),
            "medium" => Ok(RoastLevel::Medium),
            "dark" => Ok(RoastLevel::Dark),
            "espresso" => Ok(RoastLevel::Espresso),
            other => Err(format!("Unknown roast level: {}", other)),
        }
    }
}

/// Retail packaging format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FormatType {
    #[serde(rename = "12oz")]
    TwelveOunce,
    #[default]
    #[serde(rename = "5kg")]
    FiveKilo,
    #[serde(rename = "custom")]
    Custom,
}

impl FormatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::TwelveOunce => "12oz",
            FormatType::FiveKilo => "5kg",
            FormatType::Custom => "custom",
        }
    }
}

impl std::str::FromStr for FormatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "12oz" => Ok(FormatType::TwelveOunce),
            "5kg" => Ok(FormatType::FiveKilo),
            "custom" => Ok(FormatType::Custom),
            other => Err(format!("Unknown format type: {}", other)),
        }
    }
}

/// A roasting run; each bag roasted draws down green stock, so these
/// records double as the roasting-side usage history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoastedCoffeeBatch {
    pub id: Uuid,
    pub variety: String,
    pub origin: String,
    pub rating: CoffeeRating,
    pub roast_level: RoastLevel,
    pub format_type: FormatType,
    pub quantity_bags: u32,
    pub warehouse: String,
    pub roast_date: NaiveDate,
    pub linked_green_batch_id: Option<Uuid>,
    pub cost_per_bag: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a roasted batch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoastedBatchInput {
    #[validate(custom = "validate_not_blank")]
    pub variety: String,
    #[validate(custom = "validate_not_blank")]
    pub origin: String,
    #[serde(default)]
    pub rating: CoffeeRating,
    #[serde(default)]
    pub roast_level: RoastLevel,
    #[serde(default)]
    pub format_type: FormatType,
    pub quantity_bags: u32,
    #[validate(custom = "validate_not_blank")]
    pub warehouse: String,
    pub roast_date: NaiveDate,
    pub linked_green_batch_id: Option<Uuid>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub cost_per_bag: Option<Decimal>,
    pub notes: Option<String>,
}

impl RoastedBatchInput {
    pub fn into_batch(self, id: Uuid, created_at: DateTime<Utc>) -> RoastedCoffeeBatch {
        RoastedCoffeeBatch {
            id,
            variety: self.variety.trim().to_string(),
            origin: self.origin.trim().to_string(),
            rating: self.rating,
            roast_level: self.roast_level,
            format_type: self.format_type,
            quantity_bags: self.quantity_bags,
            warehouse: self.warehouse.trim().to_string(),
            roast_date: self.roast_date,
            linked_green_batch_id: self.linked_green_batch_id,
            cost_per_bag: self.cost_per_bag,
            notes: self.notes,
            created_at,
        }
    }
}
