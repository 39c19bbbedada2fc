//! Domain logic for the school backend.
//!
//! Everything in this crate is pure: request payloads and their field
//! validation, status enums, the enrollment uniqueness rule, report math and
//! pagination arithmetic. Database access lives in `school-db`, HTTP in
//! `school-api`.

pub mod course;
pub mod enrollment;
pub mod error;
pub mod pagination;
pub mod report;
pub mod status;
pub mod student;
pub mod types;
pub mod validation;
