//! Integration tests for soft-delete and the enrollment cascade.
//!
//! Soft-deleted students and courses must vanish from `find_by_id`, lists and
//! counts, stay reachable with `include_deleted`, and take their enrollments
//! with them.

mod common;

use common::{create_course, create_student, enroll};
use rust_decimal_macros::dec;
use school_core::pagination::PAGE_SIZE;
use school_core::status::EnrollmentStatus;
use school_db::repositories::{CourseRepo, EnrollmentRepo, StudentRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_student(pool: PgPool) {
    let student = create_student(&pool, "Ana Silva").await;

    let deleted = StudentRepo::soft_delete(&pool, student.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    assert!(StudentRepo::find_by_id(&pool, student.id, false)
        .await
        .unwrap()
        .is_none());
    let tombstone = StudentRepo::find_by_id(&pool, student.id, true)
        .await
        .unwrap()
        .expect("include_deleted should still find the row");
    assert!(tombstone.deleted_at.is_some());

    assert_eq!(StudentRepo::count(&pool).await.unwrap(), 0);
    let page = StudentRepo::list_paginated(&pool, 1, PAGE_SIZE).await.unwrap();
    assert!(page.data.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let course = create_course(&pool, "English Basics", dec!(450.00)).await;

    assert!(CourseRepo::soft_delete(&pool, course.id).await.unwrap());
    assert!(
        !CourseRepo::soft_delete(&pool, course.id).await.unwrap(),
        "second soft_delete should return false"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_student_removes_enrollments(pool: PgPool) {
    let ana = create_student(&pool, "Ana Silva").await;
    let carlos = create_student(&pool, "Carlos Santos").await;
    let x = create_course(&pool, "English Basics", dec!(450.00)).await;
    let y = create_course(&pool, "Spanish Basics", dec!(400.00)).await;

    enroll(&pool, &ana, &x, dec!(450.00), EnrollmentStatus::Active).await;
    enroll(&pool, &ana, &y, dec!(400.00), EnrollmentStatus::Active).await;
    let kept = enroll(&pool, &carlos, &x, dec!(450.00), EnrollmentStatus::Active).await;

    StudentRepo::soft_delete(&pool, ana.id).await.unwrap();

    assert!(EnrollmentRepo::list_for_students(&pool, &[ana.id])
        .await
        .unwrap()
        .is_empty());
    let remaining = EnrollmentRepo::list(&pool, None, PAGE_SIZE, 0).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_course_removes_enrollments(pool: PgPool) {
    let ana = create_student(&pool, "Ana Silva").await;
    let x = create_course(&pool, "English Basics", dec!(450.00)).await;
    let enrollment = enroll(&pool, &ana, &x, dec!(450.00), EnrollmentStatus::Active).await;

    CourseRepo::soft_delete(&pool, x.id).await.unwrap();

    assert!(EnrollmentRepo::find_by_id(&pool, enrollment.id)
        .await
        .unwrap()
        .is_none());
    let loaded = StudentRepo::find_with_enrollments(&pool, ana.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.enrollments.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_reusable_after_soft_delete(pool: PgPool) {
    let ana = create_student(&pool, "Ana Silva").await;
    assert!(StudentRepo::email_taken(&pool, &ana.email, None).await.unwrap());
    assert!(
        !StudentRepo::email_taken(&pool, &ana.email, Some(ana.id))
            .await
            .unwrap(),
        "a student's own email is not a conflict"
    );

    StudentRepo::soft_delete(&pool, ana.id).await.unwrap();

    assert!(!StudentRepo::email_taken(&pool, &ana.email, None).await.unwrap());
    assert!(!StudentRepo::document_taken(&pool, &ana.document_number, None)
        .await
        .unwrap());
    // The partial unique index allows a new live row with the same values.
    create_student(&pool, "Ana Silva").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_ignores_deleted_rows(pool: PgPool) {
    let course = create_course(&pool, "English Basics", dec!(450.00)).await;
    CourseRepo::soft_delete(&pool, course.id).await.unwrap();

    let updated = CourseRepo::update(
        &pool,
        course.id,
        &common::course_input("Renamed", dec!(1.00)),
    )
    .await
    .unwrap();
    assert!(updated.is_none());
}
