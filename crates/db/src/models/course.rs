//! Course entity model.

use serde::Serialize;
use sqlx::FromRow;
use school_core::status::CourseStatus;
use school_core::types::{DbId, Money, Timestamp};

use crate::models::enrollment::EnrollmentWithStudent;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub price: Money,
    pub max_students: Option<i32>,
    #[sqlx(try_from = "String")]
    pub status: CourseStatus,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course with its enrollments, each carrying the enrolled student.
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithEnrollments {
    #[serde(flatten)]
    pub course: Course,
    pub enrollments: Vec<EnrollmentWithStudent>,
}
