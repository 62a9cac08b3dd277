//! Cupping (quality) record models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_cupping_score, validate_not_blank};

/// A single cupping evaluation of one coffee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuppingRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub variety: String,
    pub origin: String,
    pub farm: Option<String>,
    pub green_batch_id: Option<Uuid>,
    /// Total score on the SCA 100 point scale
    pub score: Decimal,
    pub attributes: CuppingAttributes,
    #[serde(default)]
    pub descriptors: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Optional per-attribute scores captured on the cupping form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CuppingAttributes {
    pub sweetness: Option<Decimal>,
    pub acidity: Option<Decimal>,
    pub body: Option<Decimal>,
    pub finish: Option<Decimal>,
    pub uniformity: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub cleanliness: Option<Decimal>,
}

/// Input for recording a cupping evaluation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CuppingRecordInput {
    pub date: NaiveDate,
    #[validate(custom = "validate_not_blank")]
    pub variety: String,
    #[validate(custom = "validate_not_blank")]
    pub origin: String,
    pub farm: Option<String>,
    pub green_batch_id: Option<Uuid>,
    #[validate(custom = "validate_cupping_score")]
    pub score: Decimal,
    #[serde(default)]
    pub attributes: CuppingAttributes,
    #[serde(default)]
    pub descriptors: Vec<String>,
    pub notes: Option<String>,
}

impl CuppingRecordInput {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> CuppingRecord {
        CuppingRecord {
            id,
            date: self.date,
            variety: self.variety.trim().to_string(),
            origin: self.origin.trim().to_string(),
            farm: self.farm,
            green_batch_id: self.green_batch_id,
            score: self.score,
            attributes: self.attributes,
            descriptors: self.descriptors,
            notes: self.notes,
            created_at,
        }
    }
}

/// Coffee classification based on cupping score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeClassification {
    /// 90+ points
    Outstanding,
    /// 85-89.99 points
    Excellent,
    /// 80-84.99 points
    VeryGood,
    /// Below 80 points
    BelowSpecialty,
}

impl std::fmt::Display for CoffeeClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoffeeClassification::Outstanding => write!(f, "Outstanding"),
            CoffeeClassification::Excellent => write!(f, "Excellent"),
            CoffeeClassification::VeryGood => write!(f, "Very Good"),
            CoffeeClassification::BelowSpecialty => write!(f, "Below Specialty"),
        }
    }
}

/// Classify coffee based on cupping score
pub fn classify_by_score(score: Decimal) -> CoffeeClassification {
    if score >= Decimal::from(90) {
        CoffeeClassification::Outstanding
    } else if score >= Decimal::from(85) {
        CoffeeClassification::Excellent
    } else if score >= Decimal::from(80) {
        CoffeeClassification::VeryGood
    } else {
        CoffeeClassification::BelowSpecialty
    }
}
