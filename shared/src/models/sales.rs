//! Point-of-sale usage models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_not_blank;

/// A sales line exported from the point-of-sale system
///
/// `mapped_variety` links the till's product name to a coffee variety; until
/// that mapping exists the entry is ignored by usage estimation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub product_name: String,
    pub mapped_variety: Option<String>,
    pub quantity: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a sales entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SalesEntryInput {
    pub date: NaiveDate,
    #[validate(custom = "validate_not_blank")]
    pub product_name: String,
    pub mapped_variety: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    pub notes: Option<String>,
}

impl SalesEntryInput {
    pub fn into_entry(self, id: Uuid, created_at: DateTime<Utc>) -> SalesEntry {
        SalesEntry {
            id,
            date: self.date,
            product_name: self.product_name.trim().to_string(),
            mapped_variety: self
                .mapped_variety
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            quantity: self.quantity,
            notes: self.notes,
            created_at,
        }
    }
}
