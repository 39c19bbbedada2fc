//! Enrollment payload validation and the one-enrollment-per-pair rule.
//!
//! A student may hold at most one enrollment per course. The database
//! enforces this with the `uq_enrollments_student_course` constraint; the
//! check here runs first so callers get a field-level message instead of a
//! constraint violation.

use serde::Deserialize;

use crate::error::{CoreError, FieldErrors};
use crate::status::EnrollmentStatus;
use crate::types::{Date, DbId, Money};
use crate::validation::{
    check_money, normalize_optional, parse_date, parse_enum, parse_reference, required, FieldValue,
};

const STATUS_VALUES: &[&str] = &["active", "cancelled", "completed"];

/// Message attached to `student_id` when the pair is already taken.
pub const DUPLICATE_ENROLLMENT_MESSAGE: &str = "This student is already enrolled in this course.";

/// Raw enrollment body for create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub start_date: Option<String>,
    pub price_paid: Option<FieldValue<Money>>,
    pub status: Option<String>,
}

/// An enrollment payload that passed field validation. Whether the
/// referenced student and course exist is checked against the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentInput {
    pub student_id: DbId,
    pub course_id: DbId,
    pub start_date: Date,
    pub price_paid: Money,
    pub status: EnrollmentStatus,
}

impl EnrollmentRequest {
    pub fn into_input(self) -> Result<EnrollmentInput, CoreError> {
        let mut errors = FieldErrors::new();

        let student_id = required(normalize_optional(self.student_id), "student_id", &mut errors)
            .and_then(|raw| parse_reference(&raw, "student_id", "student", &mut errors));
        let course_id = required(normalize_optional(self.course_id), "course_id", &mut errors)
            .and_then(|raw| parse_reference(&raw, "course_id", "course", &mut errors));
        let start_date = required(normalize_optional(self.start_date), "start_date", &mut errors)
            .and_then(|raw| parse_date(&raw, "start_date", &mut errors));
        let price_paid = required(self.price_paid, "price_paid", &mut errors)
            .and_then(|v| v.check("price_paid", "a number", &mut errors))
            .and_then(|price| check_money(price, "price_paid", &mut errors));
        let status = required(normalize_optional(self.status), "status", &mut errors).and_then(
            |raw| parse_enum::<EnrollmentStatus>(&raw, "status", STATUS_VALUES, &mut errors),
        );

        let (Some(student_id), Some(course_id), Some(start_date), Some(price_paid), Some(status)) =
            (student_id, course_id, start_date, price_paid, status)
        else {
            return Err(CoreError::InvalidFields(errors));
        };
        errors.into_result()?;

        Ok(EnrollmentInput {
            student_id,
            course_id,
            start_date,
            price_paid,
            status,
        })
    }
}

/// Whether `existing` (the id of the enrollment currently holding the
/// student/course pair, if any) blocks a write by `current` (the enrollment
/// being updated, `None` on create).
pub fn is_duplicate_enrollment(existing: Option<DbId>, current: Option<DbId>) -> bool {
    match (existing, current) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(existing), Some(current)) => existing != current,
    }
}

/// Record the duplicate-pair error on `student_id` when the write would
/// create a second enrollment for the same student and course.
pub fn ensure_unique_enrollment(
    existing: Option<DbId>,
    current: Option<DbId>,
    errors: &mut FieldErrors,
) {
    if is_duplicate_enrollment(existing, current) {
        errors.add("student_id", DUPLICATE_ENROLLMENT_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::types::new_id;

    fn valid() -> EnrollmentRequest {
        EnrollmentRequest {
            student_id: Some(new_id().to_string()),
            course_id: Some(new_id().to_string()),
            start_date: Some("2024-01-15".into()),
            price_paid: Some(dec!(450.00).into()),
            status: Some("active".into()),
        }
    }

    fn field_errors(request: EnrollmentRequest) -> FieldErrors {
        match request.into_input() {
            Err(CoreError::InvalidFields(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    // -- uniqueness rule --------------------------------------------------

    #[test]
    fn no_existing_pair_is_never_a_duplicate() {
        assert!(!is_duplicate_enrollment(None, None));
        assert!(!is_duplicate_enrollment(None, Some(new_id())));
    }

    #[test]
    fn any_existing_pair_blocks_create() {
        assert!(is_duplicate_enrollment(Some(new_id()), None));
    }

    #[test]
    fn update_may_keep_its_own_pair() {
        let id = new_id();
        assert!(!is_duplicate_enrollment(Some(id), Some(id)));
    }

    #[test]
    fn update_onto_another_enrollments_pair_is_blocked() {
        assert!(is_duplicate_enrollment(Some(new_id()), Some(new_id())));
    }

    #[test]
    fn duplicate_recorded_on_student_id() {
        let mut errors = FieldErrors::new();
        ensure_unique_enrollment(Some(new_id()), None, &mut errors);
        assert_eq!(errors.messages("student_id"), [DUPLICATE_ENROLLMENT_MESSAGE]);
    }

    // -- field validation -------------------------------------------------

    #[test]
    fn valid_enrollment() {
        let input = valid().into_input().unwrap();
        assert_eq!(input.status, EnrollmentStatus::Active);
        assert_eq!(input.start_date, Date::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(input.price_paid.to_string(), "450.00");
    }

    #[test]
    fn negative_price_paid_rejected() {
        let errors = field_errors(EnrollmentRequest {
            price_paid: Some(dec!(-10).into()),
            ..valid()
        });
        assert_eq!(
            errors.messages("price_paid"),
            ["The price_paid may not be negative."]
        );
    }

    #[test]
    fn bad_date_and_status_reported_together() {
        let errors = field_errors(EnrollmentRequest {
            start_date: Some("2024-13-01".into()),
            status: Some("pending".into()),
            ..valid()
        });
        assert!(errors.contains("start_date"));
        assert_eq!(
            errors.messages("status"),
            ["The status must be one of: active, cancelled, completed."]
        );
    }

    #[test]
    fn malformed_ids_reported_as_missing_entities() {
        let errors = field_errors(EnrollmentRequest {
            student_id: Some("42".into()),
            course_id: Some("abc".into()),
            ..valid()
        });
        assert_eq!(
            errors.messages("student_id"),
            ["The selected student does not exist."]
        );
        assert_eq!(
            errors.messages("course_id"),
            ["The selected course does not exist."]
        );
    }

    #[test]
    fn non_numeric_price_paid_is_a_field_error() {
        let mut body = serde_json::json!({
            "student_id": new_id().to_string(),
            "course_id": new_id().to_string(),
            "start_date": "2024-01-15",
            "price_paid": "abc",
            "status": "active",
        });
        let errors = field_errors(serde_json::from_value(body.clone()).unwrap());
        assert_eq!(errors.messages("price_paid"), ["The price_paid must be a number."]);

        body["price_paid"] = serde_json::json!(true);
        let errors = field_errors(serde_json::from_value(body).unwrap());
        assert!(errors.contains("price_paid"));
    }

    #[test]
    fn empty_body_reports_every_field() {
        let errors = field_errors(EnrollmentRequest::default());
        for field in ["student_id", "course_id", "start_date", "price_paid", "status"] {
            assert_eq!(
                errors.messages(field),
                [format!("The {field} field is required.")]
            );
        }
    }
}
