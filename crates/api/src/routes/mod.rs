//! Route tree. Resource routers are nested under `/api/v1` by
//! [`crate::router::build_app_router`]; health sits at the root.

pub mod courses;
pub mod enrollments;
pub mod health;
pub mod reports;
pub mod students;

use axum::Router;

use crate::state::AppState;

/// All versioned API routes, to be nested at `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/students", students::router())
        .nest("/courses", courses::router())
        .nest("/enrollments", enrollments::router())
        .nest("/reports", reports::router())
}
