//! Handlers for the `/courses` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use school_core::course::CourseRequest;
use school_core::pagination::{clamp_page, Paginated, PAGE_SIZE};
use school_core::types::DbId;
use school_db::models::course::CourseWithEnrollments;
use school_db::repositories::CourseRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query::PageParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const ENTITY: &str = "Course";

/// GET /api/v1/courses
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<ApiResponse<Paginated<CourseWithEnrollments>>>> {
    let page = clamp_page(params.page);
    let courses = CourseRepo::list_paginated(&state.pool, page, PAGE_SIZE).await?;
    Ok(Json(ApiResponse::data(courses)))
}

/// POST /api/v1/courses
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CourseWithEnrollments>>)> {
    let input = request.into_input()?;
    let course = CourseRepo::create(&state.pool, &input).await?;
    tracing::info!(course_id = %course.id, status = %course.status, "Course created");

    let body = CourseWithEnrollments {
        course,
        enrollments: Vec::new(),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(body).with_message("Course created successfully")),
    ))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<CourseWithEnrollments>>> {
    let course = CourseRepo::find_with_enrollments(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    Ok(Json(ApiResponse::data(course)))
}

/// PUT /api/v1/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> AppResult<Json<ApiResponse<CourseWithEnrollments>>> {
    CourseRepo::find_by_id(&state.pool, id, false)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    let input = request.into_input()?;
    CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    let course = CourseRepo::find_with_enrollments(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    tracing::info!(course_id = %id, "Course updated");

    Ok(Json(
        ApiResponse::data(course).with_message("Course updated successfully"),
    ))
}

/// DELETE /api/v1/courses/{id}
///
/// Soft-deletes the course and removes its enrollments.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !CourseRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(course_id = %id, "Course deleted");
    Ok(Json(ApiResponse::message("Course deleted successfully")))
}
