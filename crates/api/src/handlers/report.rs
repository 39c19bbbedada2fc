//! Handlers for the `/reports` endpoints.

use axum::extract::State;
use axum::Json;
use school_db::models::report::{
    CourseRevenue, CourseStudentCount, Dashboard, StudentInvestment, Summary,
};
use school_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/reports/total-by-student
pub async fn total_by_student(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<StudentInvestment>>>> {
    let rows = ReportRepo::total_by_student(&state.pool).await?;
    Ok(Json(
        ApiResponse::data(rows).with_title("Total Invested per Student"),
    ))
}

/// GET /api/v1/reports/courses-with-most-students
pub async fn courses_with_most_students(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CourseStudentCount>>>> {
    let rows = ReportRepo::courses_with_most_students(&state.pool).await?;
    Ok(Json(
        ApiResponse::data(rows).with_title("Courses with Most Students"),
    ))
}

/// GET /api/v1/reports/revenue-per-course
pub async fn revenue_per_course(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CourseRevenue>>>> {
    let rows = ReportRepo::revenue_per_course(&state.pool).await?;
    Ok(Json(
        ApiResponse::data(rows).with_title("Total Revenue per Course"),
    ))
}

/// GET /api/v1/reports/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Summary>>> {
    let summary = ReportRepo::summary(&state.pool).await?;
    Ok(Json(ApiResponse::data(summary).with_title("Summary")))
}

/// GET /api/v1/reports/dashboard
///
/// Never fails: aggregation errors are logged and an all-zero dashboard is
/// served instead.
pub async fn dashboard(State(state): State<AppState>) -> Json<ApiResponse<Dashboard>> {
    let dashboard = match ReportRepo::dashboard(&state.pool).await {
        Ok(dashboard) => dashboard,
        Err(err) => {
            tracing::error!(error = %err, "Dashboard aggregation failed, serving empty dashboard");
            Dashboard::empty()
        }
    };
    Json(ApiResponse::data(dashboard))
}
