//! Student request payload and field validation.
//!
//! Email and document-number uniqueness need the database and are checked by
//! the API layer after [`StudentRequest::into_input`] succeeds.

use serde::Deserialize;
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::types::Date;
use crate::validation::{normalize_optional, parse_date, required};

/// Raw student body for create and update. Every field is optional at the
/// serde level so missing values surface as field errors instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StudentRequest {
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters."))]
    pub name: Option<String>,
    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters."))]
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    #[validate(length(
        max = 50,
        message = "The document_number may not be greater than 50 characters."
    ))]
    pub document_number: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100, message = "The city may not be greater than 100 characters."))]
    pub city: Option<String>,
    #[validate(length(max = 2, message = "The state may not be greater than 2 characters."))]
    pub state: Option<String>,
    #[validate(length(max = 10, message = "The zip_code may not be greater than 10 characters."))]
    pub zip_code: Option<String>,
}

/// A student payload that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<Date>,
    pub document_number: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl StudentRequest {
    /// Run every field rule and return the typed input, or all field errors
    /// at once.
    pub fn into_input(self) -> Result<StudentInput, CoreError> {
        let mut errors = FieldErrors::new();
        let normalized = self.normalized();
        if let Err(e) = normalized.validate() {
            errors.merge(e.into());
        }

        let name = required(normalized.name, "name", &mut errors);
        let email = required(normalized.email, "email", &mut errors);
        let document_number = required(normalized.document_number, "document_number", &mut errors);
        let birth_date = match normalized.birth_date.as_deref() {
            Some(raw) => parse_date(raw, "birth_date", &mut errors),
            None => None,
        };

        let (Some(name), Some(email), Some(document_number)) = (name, email, document_number)
        else {
            return Err(CoreError::InvalidFields(errors));
        };
        errors.into_result()?;

        Ok(StudentInput {
            name,
            email: email.to_lowercase(),
            phone: normalized.phone,
            birth_date,
            document_number,
            address: normalized.address,
            city: normalized.city,
            state: normalized.state.map(|s| s.to_uppercase()),
            zip_code: normalized.zip_code,
        })
    }

    fn normalized(self) -> Self {
        Self {
            name: normalize_optional(self.name),
            email: normalize_optional(self.email),
            phone: normalize_optional(self.phone),
            birth_date: normalize_optional(self.birth_date),
            document_number: normalize_optional(self.document_number),
            address: normalize_optional(self.address),
            city: normalize_optional(self.city),
            state: normalize_optional(self.state),
            zip_code: normalize_optional(self.zip_code),
        }
    }
}
