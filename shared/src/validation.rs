//! Validation utilities for the Roastery Inventory Platform
//!
//! Field validators used by the `validator` derives on input models, plus
//! plain checks for query parameters.

use rust_decimal::Decimal;
use validator::ValidationError;

// ============================================================================
// Field Validators
// ============================================================================

/// Reject empty or whitespace-only names
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Prices and costs cannot be negative
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("negative");
        err.message = Some("Value cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Total cupping score must be on the 0-100 scale
pub fn validate_cupping_score(score: &Decimal) -> Result<(), ValidationError> {
    if *score < Decimal::ZERO || *score > Decimal::from(100) {
        let mut err = ValidationError::new("cupping_score_range");
        err.message = Some("Cupping score must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Forecast Parameter Validations
// ============================================================================

/// Target weeks of cover accepted from the reports page (1-52)
pub fn validate_target_weeks_of_cover(weeks: f64) -> Result<(), &'static str> {
    if !weeks.is_finite() || !(1.0..=52.0).contains(&weeks) {
        return Err("Target weeks of cover must be between 1 and 52");
    }
    Ok(())
}

/// Lead time and safety stock are expressed in non-negative weeks
pub fn validate_planning_weeks(weeks: f64) -> Result<(), &'static str> {
    if !weeks.is_finite() || weeks < 0.0 {
        return Err("Planning weeks must be a non-negative number");
    }
    Ok(())
}

/// Flatten `validator` errors into a field name and message
pub fn first_validation_error(errors: &validator::ValidationErrors) -> (String, String) {
    errors
        .field_errors()
        .into_iter()
        .next()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            (field.to_string(), message)
        })
        .unwrap_or_else(|| ("input".to_string(), "Invalid input".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use crate::models::{SalesEntryInput, ThresholdEntry};

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Yirgacheffe").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_non_negative_decimal() {
        assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(1250, 2)).is_ok());
        assert!(validate_non_negative_decimal(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_cupping_score() {
        assert!(validate_cupping_score(&Decimal::new(865, 1)).is_ok());
        assert!(validate_cupping_score(&Decimal::from(100)).is_ok());
        assert!(validate_cupping_score(&Decimal::from(101)).is_err());
        assert!(validate_cupping_score(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_target_weeks_of_cover() {
        assert!(validate_target_weeks_of_cover(6.0).is_ok());
        assert!(validate_target_weeks_of_cover(1.0).is_ok());
        assert!(validate_target_weeks_of_cover(52.0).is_ok());
        assert!(validate_target_weeks_of_cover(0.0).is_err());
        assert!(validate_target_weeks_of_cover(53.0).is_err());
        assert!(validate_target_weeks_of_cover(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_planning_weeks() {
        assert!(validate_planning_weeks(0.0).is_ok());
        assert!(validate_planning_weeks(4.0).is_ok());
        assert!(validate_planning_weeks(-1.0).is_err());
        assert!(validate_planning_weeks(f64::INFINITY).is_err());
    }

    #[test]
    fn test_threshold_entry_validation() {
        let entry = ThresholdEntry {
            variety: " ".to_string(),
            warehouse: "Main".to_string(),
            low_threshold: 5.0,
            critical_threshold: Some(3.0),
        };
        let errors = entry.validate().unwrap_err();
        let (field, _) = first_validation_error(&errors);
        assert_eq!(field, "variety");
    }

    #[test]
    fn test_sales_entry_rejects_negative_quantity() {
        let input = SalesEntryInput {
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            product_name: "House Espresso 12oz".to_string(),
            mapped_variety: Some("Santos".to_string()),
            quantity: -2.0,
            notes: None,
        };
        assert!(input.validate().is_err());
    }
}
