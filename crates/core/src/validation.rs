//! Field parsers shared by the request payloads.
//!
//! Each helper records a message on the given [`FieldErrors`] and returns
//! `None` when the value is missing or unusable, so a payload can collect
//! every problem in one pass.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::FieldErrors;
use crate::types::{Date, DbId, Money};

/// Largest amount a `NUMERIC(10,2)` column holds.
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Decimal places accepted for monetary input.
pub const MONEY_SCALE: u32 = 2;

/// Accepted date format for `birth_date` and `start_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Require a present value, recording `"The {field} field is required."`
/// otherwise.
pub fn required<T>(value: Option<T>, field: &str, errors: &mut FieldErrors) -> Option<T> {
    if value.is_none() {
        errors.add(field, format!("The {field} field is required."));
    }
    value
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<Date> {
    match Date::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, format!("The {field} must be a valid date (YYYY-MM-DD)."));
            None
        }
    }
}

/// Check a monetary amount: non-negative, at most two decimal places and
/// within column range.
pub fn check_money(value: Money, field: &str, errors: &mut FieldErrors) -> Option<Money> {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(field, format!("The {field} may not be negative."));
        return None;
    }
    if value.normalize().scale() > MONEY_SCALE {
        errors.add(
            field,
            format!("The {field} may have at most {MONEY_SCALE} decimal places."),
        );
        return None;
    }
    if value > MAX_MONEY {
        errors.add(field, format!("The {field} may not be greater than {MAX_MONEY}."));
        return None;
    }
    let mut value = if value.is_zero() { Decimal::ZERO } else { value };
    value.rescale(MONEY_SCALE);
    Some(value)
}

/// Parse an enumerated value through its `FromStr` impl.
pub fn parse_enum<T: FromStr>(
    raw: &str,
    field: &str,
    allowed: &[&str],
    errors: &mut FieldErrors,
) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(
                field,
                format!("The {field} must be one of: {}.", allowed.join(", ")),
            );
            None
        }
    }
}

/// Parse an entity reference. Malformed ids can never match a row, so they
/// get the same message as a missing one.
pub fn parse_reference(
    raw: &str,
    field: &str,
    entity: &str,
    errors: &mut FieldErrors,
) -> Option<DbId> {
    match DbId::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            missing_reference(field, entity, errors);
            None
        }
    }
}

/// Record that `field` points at a row that does not exist (or is deleted).
pub fn missing_reference(field: &str, entity: &str, errors: &mut FieldErrors) {
    errors.add(field, format!("The selected {entity} does not exist."));
}

/// Record that `field` collides with a value another row already holds.
pub fn already_taken(field: &str, errors: &mut FieldErrors) {
    errors.add(field, format!("The {field} has already been taken."));
}

/// A body field that was present but may not have had the expected JSON
/// type. Deserializing never fails on a type mismatch, so the mismatch can
/// be reported on the field instead of rejecting the whole body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    Valid(T),
    Invalid,
}

impl<T> FieldValue<T> {
    /// The value, or `None` after recording `"The {field} must be {expected}."`.
    pub fn check(self, field: &str, expected: &str, errors: &mut FieldErrors) -> Option<T> {
        match self {
            FieldValue::Valid(value) => Some(value),
            FieldValue::Invalid => {
                errors.add(field, format!("The {field} must be {expected}."));
                None
            }
        }
    }
}

impl<T> From<T> for FieldValue<T> {
    fn from(value: T) -> Self {
        FieldValue::Valid(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for FieldValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(T::deserialize(raw).map_or(FieldValue::Invalid, FieldValue::Valid))
    }
}

/// Require `value >= min`.
pub fn at_least(value: i32, min: i32, field: &str, errors: &mut FieldErrors) -> Option<i32> {
    if value < min {
        errors.add(field, format!("The {field} must be at least {min}."));
        return None;
    }
    Some(value)
}

/// Trim and drop empty optional strings so `""` and absent mean the same.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn money_accepts_two_places_and_rescales() {
        let mut errors = FieldErrors::new();
        let value = check_money(dec!(450), "price", &mut errors).unwrap();
        assert_eq!(value.to_string(), "450.00");
        assert!(errors.is_empty());
    }

    #[test]
    fn money_rejects_negative() {
        let mut errors = FieldErrors::new();
        assert!(check_money(dec!(-10), "price_paid", &mut errors).is_none());
        assert_eq!(
            errors.messages("price_paid"),
            ["The price_paid may not be negative."]
        );
    }

    #[test]
    fn money_accepts_zero_and_negative_zero() {
        let mut errors = FieldErrors::new();
        assert!(check_money(dec!(0), "price", &mut errors).is_some());
        assert!(check_money(dec!(-0.00), "price", &mut errors).is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn money_rejects_extra_precision() {
        let mut errors = FieldErrors::new();
        assert!(check_money(dec!(10.005), "price", &mut errors).is_none());
        assert!(errors.contains("price"));
    }

    #[test]
    fn money_trailing_zeros_do_not_count_as_precision() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            check_money(dec!(10.5000), "price", &mut errors),
            Some(dec!(10.50))
        );
    }

    #[test]
    fn max_money_matches_column_bound() {
        assert_eq!(MAX_MONEY.to_string(), "99999999.99");
    }

    #[test]
    fn money_rejects_out_of_range() {
        let mut errors = FieldErrors::new();
        assert!(check_money(dec!(100000000.00), "price", &mut errors).is_none());
        assert!(check_money(MAX_MONEY, "price", &mut FieldErrors::new()).is_some());
    }

    #[test]
    fn date_parsing() {
        let mut errors = FieldErrors::new();
        assert!(parse_date("2024-01-15", "start_date", &mut errors).is_some());
        assert!(parse_date("2024-02-30", "start_date", &mut errors).is_none());
        assert!(parse_date("15/01/2024", "start_date", &mut errors).is_none());
        assert_eq!(errors.messages("start_date").len(), 2);
    }

    #[test]
    fn field_value_keeps_type_mismatch_on_the_field() {
        let ok: FieldValue<i32> = serde_json::from_value(serde_json::json!(120)).unwrap();
        let bad: FieldValue<i32> = serde_json::from_value(serde_json::json!("lots")).unwrap();
        let fractional: FieldValue<i32> = serde_json::from_value(serde_json::json!(1.5)).unwrap();
        assert_eq!(ok, FieldValue::Valid(120));
        assert_eq!(bad, FieldValue::Invalid);
        assert_eq!(fractional, FieldValue::Invalid);

        let mut errors = FieldErrors::new();
        assert_eq!(bad.check("duration_hours", "an integer", &mut errors), None);
        assert_eq!(
            errors.messages("duration_hours"),
            ["The duration_hours must be an integer."]
        );
    }

    #[test]
    fn at_least_bound() {
        let mut errors = FieldErrors::new();
        assert_eq!(at_least(1, 1, "max_students", &mut errors), Some(1));
        assert_eq!(at_least(0, 1, "max_students", &mut errors), None);
        assert_eq!(
            errors.messages("max_students"),
            ["The max_students must be at least 1."]
        );
    }

    #[test]
    fn required_records_missing() {
        let mut errors = FieldErrors::new();
        assert_eq!(required(Some(1), "a", &mut errors), Some(1));
        assert_eq!(required::<i32>(None, "b", &mut errors), None);
        assert_eq!(errors.messages("b"), ["The b field is required."]);
    }

    #[test]
    fn malformed_reference_reads_as_missing_entity() {
        let mut errors = FieldErrors::new();
        assert!(parse_reference("not-a-uuid", "student_id", "student", &mut errors).is_none());
        assert_eq!(
            errors.messages("student_id"),
            ["The selected student does not exist."]
        );
    }

    #[test]
    fn normalize_optional_drops_blank() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" SP ".into())), Some("SP".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
