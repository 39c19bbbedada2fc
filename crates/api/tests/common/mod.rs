#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use school_api::config::{LogFormat, ServerConfig};
use school_api::router::build_app_router;
use school_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused-in-tests".to_string(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        seed_demo_data: false,
    }
}

/// Build the full application router, with every middleware layer, over the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn student_body(name: &str, email: &str, document: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "phone": "(11) 99999-1111",
        "birth_date": "1995-05-15",
        "document_number": document,
        "city": "São Paulo",
        "state": "SP",
    })
}

pub fn course_body(name: &str, price: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "Test course",
        "duration_hours": 120,
        "price": price,
        "max_students": 15,
        "status": "active",
    })
}

pub fn enrollment_body(student_id: &str, course_id: &str, price_paid: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "student_id": student_id,
        "course_id": course_id,
        "start_date": "2024-01-15",
        "price_paid": price_paid,
        "status": status,
    })
}

/// Create a student through the API and return its id.
pub async fn create_student(pool: &PgPool, name: &str) -> String {
    let slug = name.to_lowercase().replace(' ', ".");
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/students",
        student_body(name, &format!("{slug}@email.com"), &format!("doc-{slug}")),
    )
    .await;
    assert_eq!(response.status(), 201, "student fixture should be created");
    id_of(response).await
}

/// Create a course through the API and return its id.
pub async fn create_course(pool: &PgPool, name: &str, price: &str) -> String {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/courses",
        course_body(name, price),
    )
    .await;
    assert_eq!(response.status(), 201, "course fixture should be created");
    id_of(response).await
}

/// Create an enrollment through the API and return its id.
pub async fn enroll(pool: &PgPool, student_id: &str, course_id: &str, price_paid: &str, status: &str) -> String {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/enrollments",
        enrollment_body(student_id, course_id, price_paid, status),
    )
    .await;
    assert_eq!(response.status(), 201, "enrollment fixture should be created");
    id_of(response).await
}

async fn id_of(response: Response<Body>) -> String {
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}
