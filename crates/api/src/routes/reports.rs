//! Route definitions for the read-only `/reports` endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/total-by-student", get(report::total_by_student))
        .route(
            "/courses-with-most-students",
            get(report::courses_with_most_students),
        )
        .route("/revenue-per-course", get(report::revenue_per_course))
        .route("/summary", get(report::summary))
        .route("/dashboard", get(report::dashboard))
}
