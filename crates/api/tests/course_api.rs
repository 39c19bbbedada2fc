//! HTTP-level integration tests for the `/courses` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, course_body, create_course, create_student, delete, enroll, get, post_json, put_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_course_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/courses", course_body("English Basics", "450")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Course created successfully");
    assert_eq!(json["data"]["price"], "450.00");
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["max_students"], 15);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_course_fields_return_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/courses",
        serde_json::json!({
            "name": "Broken",
            "duration_hours": 0,
            "price": -5,
            "max_students": 0,
            "status": "archived",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    for field in ["duration_hours", "price", "max_students", "status"] {
        assert!(json["errors"][field].is_array(), "{field} should be reported");
    }
    assert!(json["errors"]["name"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_course(pool: PgPool) {
    let id = create_course(&pool, "English Basics", "450.00").await;

    let mut body = course_body("English Basics", "499.90");
    body["status"] = "inactive".into();
    let app = common::build_test_app(pool);
    let response = put_json(app, &format!("/api/v1/courses/{id}"), body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Course updated successfully");
    assert_eq!(json["data"]["price"], "499.90");
    assert_eq!(json["data"]["status"], "inactive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_course_includes_enrollments_with_student(pool: PgPool) {
    let student = create_student(&pool, "Ana Silva").await;
    let course = create_course(&pool, "English Basics", "450.00").await;
    enroll(&pool, &student, &course, "450.00", "active").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/courses/{course}")).await).await;
    let enrollments = json["data"]["enrollments"].as_array().unwrap();
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0]["student"]["name"], "Ana Silva");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_course_removes_it_from_reports(pool: PgPool) {
    let student = create_student(&pool, "Ana Silva").await;
    let course = create_course(&pool, "English Basics", "450.00").await;
    enroll(&pool, &student, &course, "450.00", "active").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/courses/{course}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Course deleted successfully");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/reports/revenue-per-course").await).await;
    assert_eq!(json["data"], serde_json::json!([]));

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/reports/total-by-student").await).await;
    assert_eq!(json["data"][0]["total_invested"], "0.00");
}
