//! Repository for the `courses` table.

use std::collections::HashMap;

use sqlx::PgPool;
use school_core::course::CourseInput;
use school_core::pagination::{page_offset, Paginated};
use school_core::types::{new_id, DbId};

use crate::models::course::{Course, CourseWithEnrollments};
use crate::repositories::EnrollmentRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, description, duration_hours, price, max_students, \
    status, deleted_at, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CourseInput) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (id, name, description, duration_hours, price, max_students, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_hours)
            .bind(input.price)
            .bind(input.max_students)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await?;
        tracing::debug!(course_id = %course.id, "Course inserted");
        Ok(course)
    }

    /// Find a course by ID. Soft-deleted rows are only returned when
    /// `include_deleted` is set.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Course>, sqlx::Error> {
        let filter = if include_deleted {
            ""
        } else {
            " AND deleted_at IS NULL"
        };
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1{filter}");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several courses by ID, soft-deleted ones included.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Course>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = ANY($1)");
        sqlx::query_as::<_, Course>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// One page of live courses in creation order.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses WHERE deleted_at IS NULL
             ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of live courses.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await
    }

    /// Replace every editable field of a live course.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CourseInput,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                name = $2,
                description = $3,
                duration_hours = $4,
                price = $5,
                max_students = $6,
                status = $7
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_hours)
            .bind(input.price)
            .bind(input.max_students)
            .bind(input.status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a course and hard-delete its enrollments in one
    /// transaction. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let removed = sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::debug!(course_id = %id, enrollments_removed = removed, "Course soft-deleted");
        Ok(true)
    }

    /// Find a live course together with its enrollments and their students.
    pub async fn find_with_enrollments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CourseWithEnrollments>, sqlx::Error> {
        match Self::find_by_id(pool, id, false).await? {
            Some(course) => {
                let mut loaded = Self::attach_enrollments(pool, vec![course]).await?;
                Ok(loaded.pop())
            }
            None => Ok(None),
        }
    }

    /// One page of live courses with their enrollments and students loaded.
    pub async fn list_paginated(
        pool: &PgPool,
        page: i64,
        per_page: i64,
    ) -> Result<Paginated<CourseWithEnrollments>, sqlx::Error> {
        let total = Self::count(pool).await?;
        let courses = Self::list(pool, per_page, page_offset(page, per_page)).await?;
        let data = Self::attach_enrollments(pool, courses).await?;
        Ok(Paginated::new(data, page, per_page, total))
    }

    async fn attach_enrollments(
        pool: &PgPool,
        courses: Vec<Course>,
    ) -> Result<Vec<CourseWithEnrollments>, sqlx::Error> {
        let ids: Vec<DbId> = courses.iter().map(|c| c.id).collect();
        let enrollments = EnrollmentRepo::list_for_courses(pool, &ids).await?;
        let mut by_course: HashMap<DbId, Vec<_>> = HashMap::new();
        for enrollment in EnrollmentRepo::with_students(pool, enrollments).await? {
            by_course
                .entry(enrollment.enrollment.course_id)
                .or_default()
                .push(enrollment);
        }

        Ok(courses
            .into_iter()
            .map(|course| CourseWithEnrollments {
                enrollments: by_course.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }
}
