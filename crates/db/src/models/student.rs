//! Student entity model.

use serde::Serialize;
use sqlx::FromRow;
use school_core::types::{Date, DbId, Timestamp};

use crate::models::enrollment::EnrollmentWithCourse;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<Date>,
    pub document_number: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A student with every enrollment it holds, each carrying its course.
#[derive(Debug, Clone, Serialize)]
pub struct StudentWithEnrollments {
    #[serde(flatten)]
    pub student: Student,
    pub enrollments: Vec<EnrollmentWithCourse>,
}
