//! Repository for the `students` table.

use std::collections::HashMap;

use sqlx::PgPool;
use school_core::pagination::{page_offset, Paginated};
use school_core::student::StudentInput;
use school_core::types::{new_id, DbId};

use crate::models::student::{Student, StudentWithEnrollments};
use crate::repositories::EnrollmentRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, email, phone, birth_date, document_number, \
    address, city, state, zip_code, deleted_at, created_at, updated_at";

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &StudentInput) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students
                (id, name, email, phone, birth_date, document_number, address, city, state, zip_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.birth_date)
            .bind(&input.document_number)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .fetch_one(pool)
            .await?;
        tracing::debug!(student_id = %student.id, "Student inserted");
        Ok(student)
    }

    /// Find a student by ID. Soft-deleted rows are only returned when
    /// `include_deleted` is set.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Student>, sqlx::Error> {
        let filter = if include_deleted {
            ""
        } else {
            " AND deleted_at IS NULL"
        };
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1{filter}");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several students by ID, soft-deleted ones included. Order is
    /// unspecified.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Student>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = ANY($1)");
        sqlx::query_as::<_, Student>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// One page of live students in creation order.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM students WHERE deleted_at IS NULL
             ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of live students.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await
    }

    /// Replace every editable field of a live student.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &StudentInput,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                name = $2,
                email = $3,
                phone = $4,
                birth_date = $5,
                document_number = $6,
                address = $7,
                city = $8,
                state = $9,
                zip_code = $10
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.birth_date)
            .bind(&input.document_number)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a student and hard-delete its enrollments in one
    /// transaction. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE students SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let removed = sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::debug!(student_id = %id, enrollments_removed = removed, "Student soft-deleted");
        Ok(true)
    }

    /// Whether a live student other than `exclude_id` already uses `email`.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM students
                WHERE email = $1 AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a live student other than `exclude_id` already uses
    /// `document_number`.
    pub async fn document_taken(
        pool: &PgPool,
        document_number: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM students
                WHERE document_number = $1 AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
             )",
        )
        .bind(document_number)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Find a live student together with its enrollments and their courses.
    pub async fn find_with_enrollments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StudentWithEnrollments>, sqlx::Error> {
        match Self::find_by_id(pool, id, false).await? {
            Some(student) => {
                let mut loaded = Self::attach_enrollments(pool, vec![student]).await?;
                Ok(loaded.pop())
            }
            None => Ok(None),
        }
    }

    /// One page of live students with their enrollments and courses loaded.
    pub async fn list_paginated(
        pool: &PgPool,
        page: i64,
        per_page: i64,
    ) -> Result<Paginated<StudentWithEnrollments>, sqlx::Error> {
        let total = Self::count(pool).await?;
        let students = Self::list(pool, per_page, page_offset(page, per_page)).await?;
        let data = Self::attach_enrollments(pool, students).await?;
        Ok(Paginated::new(data, page, per_page, total))
    }

    async fn attach_enrollments(
        pool: &PgPool,
        students: Vec<Student>,
    ) -> Result<Vec<StudentWithEnrollments>, sqlx::Error> {
        let ids: Vec<DbId> = students.iter().map(|s| s.id).collect();
        let enrollments = EnrollmentRepo::list_for_students(pool, &ids).await?;
        let mut by_student: HashMap<DbId, Vec<_>> = HashMap::new();
        for enrollment in EnrollmentRepo::with_courses(pool, enrollments).await? {
            by_student
                .entry(enrollment.enrollment.student_id)
                .or_default()
                .push(enrollment);
        }

        Ok(students
            .into_iter()
            .map(|student| StudentWithEnrollments {
                enrollments: by_student.remove(&student.id).unwrap_or_default(),
                student,
            })
            .collect())
    }
}
