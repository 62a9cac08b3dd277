//! Weight unit conversion

use crate::types::WeightUnit;

pub const POUNDS_PER_KILOGRAM: f64 = 2.20462;
pub const GRAMS_PER_POUND: f64 = 453.592;
pub const OUNCES_PER_POUND: f64 = 16.0;

/// Convert a weight to pounds
///
/// Unknown units pass the value through unchanged rather than failing.
pub fn to_pounds(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lb => value,
        WeightUnit::Kg => value * POUNDS_PER_KILOGRAM,
        WeightUnit::Oz => value / OUNCES_PER_POUND,
        WeightUnit::G => value / GRAMS_PER_POUND,
        WeightUnit::Unknown => value,
    }
}

/// Convert a price quoted per `unit` into a price per pound
pub fn price_per_pound(price: f64, unit: WeightUnit) -> f64 {
    let pounds = to_pounds(1.0, unit);
    if pounds > 0.0 {
        price / pounds
    } else {
        price
    }
}
