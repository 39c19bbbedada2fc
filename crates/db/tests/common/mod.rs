//! Fixtures shared by the database integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use school_core::course::CourseInput;
use school_core::enrollment::EnrollmentInput;
use school_core::status::{CourseStatus, EnrollmentStatus};
use school_core::student::StudentInput;
use school_core::types::{Date, DbId};
use school_db::models::course::Course;
use school_db::models::enrollment::Enrollment;
use school_db::models::student::Student;
use school_db::repositories::{CourseRepo, EnrollmentRepo, StudentRepo};
use sqlx::PgPool;

pub fn student_input(name: &str, email: &str, document: &str) -> StudentInput {
    StudentInput {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        birth_date: None,
        document_number: document.to_string(),
        address: None,
        city: None,
        state: None,
        zip_code: None,
    }
}

pub fn course_input(name: &str, price: Decimal) -> CourseInput {
    CourseInput {
        name: name.to_string(),
        description: None,
        duration_hours: 40,
        price,
        max_students: None,
        status: CourseStatus::Active,
    }
}

pub fn enrollment_input(
    student_id: DbId,
    course_id: DbId,
    price_paid: Decimal,
    status: EnrollmentStatus,
) -> EnrollmentInput {
    EnrollmentInput {
        student_id,
        course_id,
        start_date: Date::from_ymd_opt(2024, 1, 15).unwrap(),
        price_paid,
        status,
    }
}

pub async fn create_student(pool: &PgPool, name: &str) -> Student {
    let slug = name.to_lowercase().replace(' ', ".");
    StudentRepo::create(
        pool,
        &student_input(name, &format!("{slug}@example.com"), &format!("doc-{slug}")),
    )
    .await
    .unwrap()
}

pub async fn create_course(pool: &PgPool, name: &str, price: Decimal) -> Course {
    CourseRepo::create(pool, &course_input(name, price)).await.unwrap()
}

pub async fn enroll(
    pool: &PgPool,
    student: &Student,
    course: &Course,
    price_paid: Decimal,
    status: EnrollmentStatus,
) -> Enrollment {
    EnrollmentRepo::create(
        pool,
        &enrollment_input(student.id, course.id, price_paid, status),
    )
    .await
    .unwrap()
}
