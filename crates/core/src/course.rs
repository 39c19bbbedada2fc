//! Course request payload and field validation.

use serde::Deserialize;
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::status::CourseStatus;
use crate::types::Money;
use crate::validation::{
    at_least, check_money, normalize_optional, parse_enum, required, FieldValue,
};

const STATUS_VALUES: &[&str] = &["active", "inactive"];

/// Raw course body for create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CourseRequest {
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_hours: Option<FieldValue<i32>>,
    pub price: Option<FieldValue<Money>>,
    pub max_students: Option<FieldValue<i32>>,
    pub status: Option<String>,
}

/// A course payload that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub price: Money,
    pub max_students: Option<i32>,
    pub status: CourseStatus,
}

impl CourseRequest {
    pub fn into_input(self) -> Result<CourseInput, CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.merge(e.into());
        }

        let name = required(normalize_optional(self.name), "name", &mut errors);
        let duration_hours = required(self.duration_hours, "duration_hours", &mut errors)
            .and_then(|v| v.check("duration_hours", "an integer", &mut errors))
            .and_then(|hours| at_least(hours, 1, "duration_hours", &mut errors));
        let price = required(self.price, "price", &mut errors)
            .and_then(|v| v.check("price", "a number", &mut errors))
            .and_then(|price| check_money(price, "price", &mut errors));
        let max_students = match self.max_students {
            Some(raw) => raw
                .check("max_students", "an integer", &mut errors)
                .and_then(|max| at_least(max, 1, "max_students", &mut errors))
                .map(Some),
            None => Some(None),
        };
        let status = required(normalize_optional(self.status), "status", &mut errors)
            .and_then(|raw| parse_enum::<CourseStatus>(&raw, "status", STATUS_VALUES, &mut errors));

        let (Some(name), Some(duration_hours), Some(price), Some(max_students), Some(status)) =
            (name, duration_hours, price, max_students, status)
        else {
            return Err(CoreError::InvalidFields(errors));
        };
        errors.into_result()?;

        Ok(CourseInput {
            name,
            description: normalize_optional(self.description),
            duration_hours,
            price,
            max_students,
            status,
        })
    }
}
