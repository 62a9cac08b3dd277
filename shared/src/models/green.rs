//! Green coffee models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::WeightUnit;
use crate::validation::{validate_non_negative_decimal, validate_not_blank};

/// Importer grade printed on the green coffee bag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CoffeeRating {
    #[serde(rename = "AAA+")]
    AaaPlus,
    #[serde(rename = "AAA")]
    Aaa,
    #[default]
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "A")]
    A,
}

impl CoffeeRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoffeeRating::AaaPlus => "AAA+",
            CoffeeRating::Aaa => "AAA",
            CoffeeRating::Aa => "AA",
            CoffeeRating::A => "A",
        }
    }
}

impl std::str::FromStr for CoffeeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AAA+" => Ok(CoffeeRating::AaaPlus),
            "AAA" => Ok(CoffeeRating::Aaa),
            "AA" => Ok(CoffeeRating::Aa),
            "A" => Ok(CoffeeRating::A),
            other => Err(format!("Unknown coffee rating: {}", other)),
        }
    }
}

/// A physical lot of green (unroasted) coffee sitting in a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreenCoffeeBatch {
    pub id: Uuid,
    pub variety: String,
    pub origin: String,
    pub farm: Option<String>,
    pub importer: Option<String>,
    pub warehouse: String,
    pub bag_size_value: f64,
    pub bag_size_unit: WeightUnit,
    pub quantity_bags: u32,
    pub rating: CoffeeRating,
    /// Purchase price per `price_unit` of coffee
    pub price_per_unit: Option<Decimal>,
    pub price_unit: WeightUnit,
    pub delivery_cost: Option<Decimal>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording or replacing a green coffee batch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GreenBatchInput {
    #[validate(custom = "validate_not_blank")]
    pub variety: String,
    #[validate(custom = "validate_not_blank")]
    pub origin: String,
    pub farm: Option<String>,
    pub importer: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub warehouse: String,
    #[validate(range(min = 0.0))]
    pub bag_size_value: f64,
    #[serde(default)]
    pub bag_size_unit: WeightUnit,
    pub quantity_bags: u32,
    #[serde(default)]
    pub rating: CoffeeRating,
    #[validate(custom = "validate_non_negative_decimal")]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub price_unit: WeightUnit,
    #[validate(custom = "validate_non_negative_decimal")]
    pub delivery_cost: Option<Decimal>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
}

impl GreenBatchInput {
    /// Materialize the input into a stored batch
    pub fn into_batch(self, id: Uuid, created_at: DateTime<Utc>) -> GreenCoffeeBatch {
        GreenCoffeeBatch {
            id,
            variety: self.variety.trim().to_string(),
            origin: self.origin.trim().to_string(),
            farm: self.farm,
            importer: self.importer,
            warehouse: self.warehouse.trim().to_string(),
            bag_size_value: self.bag_size_value,
            bag_size_unit: self.bag_size_unit,
            quantity_bags: self.quantity_bags,
            rating: self.rating,
            price_per_unit: self.price_per_unit,
            price_unit: self.price_unit,
            delivery_cost: self.delivery_cost,
            received_date: self.received_date,
            notes: self.notes,
            created_at,
        }
    }
}
