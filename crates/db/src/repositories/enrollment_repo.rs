//! Repository for the `enrollments` table.

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor, PgPool};
use school_core::enrollment::EnrollmentInput;
use school_core::pagination::{page_offset, Paginated};
use school_core::status::EnrollmentStatus;
use school_core::types::{new_id, DbId};

use crate::models::course::Course;
use crate::models::enrollment::{
    Enrollment, EnrollmentDetail, EnrollmentWithCourse, EnrollmentWithStudent,
};
use crate::models::student::Student;
use crate::repositories::{CourseRepo, StudentRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, student_id, course_id, start_date, price_paid, status, created_at, updated_at";

/// Provides CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert a new enrollment, returning the created row.
    ///
    /// Fails with a unique violation on `uq_enrollments_student_course` if
    /// the pair is already taken.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &EnrollmentInput,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (id, student_id, course_id, start_date, price_paid, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(new_id())
            .bind(input.student_id)
            .bind(input.course_id)
            .bind(input.start_date)
            .bind(input.price_paid)
            .bind(input.status.as_str())
            .fetch_one(executor)
            .await?;
        tracing::debug!(
            enrollment_id = %enrollment.id,
            student_id = %enrollment.student_id,
            course_id = %enrollment.course_id,
            "Enrollment inserted",
        );
        Ok(enrollment)
    }

    /// Find an enrollment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// ID of the enrollment holding the (student, course) pair, if any.
    pub async fn find_id_by_pair<'e>(
        executor: impl PgExecutor<'e>,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM enrollments WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(executor)
            .await
    }

    /// Share-lock the live student and course an enrollment points at, for
    /// the rest of the surrounding transaction. A concurrent soft delete of
    /// either row waits until the transaction ends, and one that committed
    /// first makes the row read as not live.
    ///
    /// Returns whether the student and the course are live.
    pub async fn lock_parents(
        conn: &mut PgConnection,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<(bool, bool), sqlx::Error> {
        let student: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM students WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
        )
        .bind(student_id)
        .fetch_optional(&mut *conn)
        .await?;
        let course: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM courses WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
        )
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok((student.is_some(), course.is_some()))
    }

    /// One page of enrollments in creation order, optionally restricted to a
    /// single status.
    pub async fn list(
        pool: &PgPool,
        status: Option<EnrollmentStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(status.map(EnrollmentStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of enrollments, optionally restricted to a single status.
    pub async fn count(pool: &PgPool, status: Option<EnrollmentStatus>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE ($1::text IS NULL OR status = $1)")
            .bind(status.map(EnrollmentStatus::as_str))
            .fetch_one(pool)
            .await
    }

    /// All enrollments held by any of `student_ids`, in creation order.
    pub async fn list_for_students(
        pool: &PgPool,
        student_ids: &[DbId],
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE student_id = ANY($1) ORDER BY id ASC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(student_ids)
            .fetch_all(pool)
            .await
    }

    /// All enrollments in any of `course_ids`, in creation order.
    pub async fn list_for_courses(
        pool: &PgPool,
        course_ids: &[DbId],
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE course_id = ANY($1) ORDER BY id ASC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace every editable field of an enrollment.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &EnrollmentInput,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments SET
                student_id = $2,
                course_id = $3,
                start_date = $4,
                price_paid = $5,
                status = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(input.student_id)
            .bind(input.course_id)
            .bind(input.start_date)
            .bind(input.price_paid)
            .bind(input.status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete an enrollment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find an enrollment with its student and course loaded.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EnrollmentDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(enrollment) => Ok(Self::with_details(pool, vec![enrollment]).await?.pop()),
            None => Ok(None),
        }
    }

    /// One page of enrollments with students and courses loaded.
    pub async fn list_paginated(
        pool: &PgPool,
        status: Option<EnrollmentStatus>,
        page: i64,
        per_page: i64,
    ) -> Result<Paginated<EnrollmentDetail>, sqlx::Error> {
        let total = Self::count(pool, status).await?;
        let rows = Self::list(pool, status, per_page, page_offset(page, per_page)).await?;
        let data = Self::with_details(pool, rows).await?;
        Ok(Paginated::new(data, page, per_page, total))
    }

    /// Attach the course of each enrollment.
    pub async fn with_courses(
        pool: &PgPool,
        enrollments: Vec<Enrollment>,
    ) -> Result<Vec<EnrollmentWithCourse>, sqlx::Error> {
        let courses = Self::load_courses(pool, &enrollments).await?;
        Ok(enrollments
            .into_iter()
            .map(|enrollment| EnrollmentWithCourse {
                course: courses.get(&enrollment.course_id).cloned(),
                enrollment,
            })
            .collect())
    }

    /// Attach the student of each enrollment.
    pub async fn with_students(
        pool: &PgPool,
        enrollments: Vec<Enrollment>,
    ) -> Result<Vec<EnrollmentWithStudent>, sqlx::Error> {
        let students = Self::load_students(pool, &enrollments).await?;
        Ok(enrollments
            .into_iter()
            .map(|enrollment| EnrollmentWithStudent {
                student: students.get(&enrollment.student_id).cloned(),
                enrollment,
            })
            .collect())
    }

    /// Attach both the student and the course of each enrollment.
    pub async fn with_details(
        pool: &PgPool,
        enrollments: Vec<Enrollment>,
    ) -> Result<Vec<EnrollmentDetail>, sqlx::Error> {
        let students = Self::load_students(pool, &enrollments).await?;
        let courses = Self::load_courses(pool, &enrollments).await?;
        Ok(enrollments
            .into_iter()
            .map(|enrollment| EnrollmentDetail {
                student: students.get(&enrollment.student_id).cloned(),
                course: courses.get(&enrollment.course_id).cloned(),
                enrollment,
            })
            .collect())
    }

    async fn load_students(
        pool: &PgPool,
        enrollments: &[Enrollment],
    ) -> Result<HashMap<DbId, Student>, sqlx::Error> {
        let mut ids: Vec<DbId> = enrollments.iter().map(|e| e.student_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(StudentRepo::find_many(pool, &ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    async fn load_courses(
        pool: &PgPool,
        enrollments: &[Enrollment],
    ) -> Result<HashMap<DbId, Course>, sqlx::Error> {
        let mut ids: Vec<DbId> = enrollments.iter().map(|e| e.course_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(CourseRepo::find_many(pool, &ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }
}
