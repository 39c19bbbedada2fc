//! Enrollment entity model and its relation-loaded views.
//!
//! The related student or course is `Option` because the parent can be
//! soft-deleted between the two reads that assemble a view.

use serde::Serialize;
use sqlx::FromRow;
use school_core::status::EnrollmentStatus;
use school_core::types::{Date, DbId, Money, Timestamp};

use crate::models::course::Course;
use crate::models::student::Student;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub student_id: DbId,
    pub course_id: DbId,
    pub start_date: Date,
    pub price_paid: Money,
    #[sqlx(try_from = "String")]
    pub status: EnrollmentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enrollment nested under a student.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentWithCourse {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Option<Course>,
}

/// Enrollment nested under a course.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentWithStudent {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student: Option<Student>,
}

/// Enrollment with both sides of the relation.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student: Option<Student>,
    pub course: Option<Course>,
}
