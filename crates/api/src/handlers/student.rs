//! Handlers for the `/students` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use school_core::error::FieldErrors;
use school_core::pagination::{clamp_page, Paginated, PAGE_SIZE};
use school_core::student::{StudentInput, StudentRequest};
use school_core::types::DbId;
use school_core::validation::already_taken;
use school_db::models::student::StudentWithEnrollments;
use school_db::repositories::StudentRepo;
use school_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query::PageParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const ENTITY: &str = "Student";

/// GET /api/v1/students
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<Json<ApiResponse<Paginated<StudentWithEnrollments>>>> {
    let page = clamp_page(params.page);
    let students = StudentRepo::list_paginated(&state.pool, page, PAGE_SIZE).await?;
    Ok(Json(ApiResponse::data(students)))
}

/// POST /api/v1/students
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StudentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StudentWithEnrollments>>)> {
    let input = request.into_input()?;
    ensure_unique_identity(&state.pool, &input, None).await?;

    let student = StudentRepo::create(&state.pool, &input).await?;
    tracing::info!(student_id = %student.id, "Student created");

    let body = StudentWithEnrollments {
        student,
        enrollments: Vec::new(),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(body).with_message("Student created successfully")),
    ))
}

/// GET /api/v1/students/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<StudentWithEnrollments>>> {
    let student = StudentRepo::find_with_enrollments(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    Ok(Json(ApiResponse::data(student)))
}

/// PUT /api/v1/students/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(request): ApiJson<StudentRequest>,
) -> AppResult<Json<ApiResponse<StudentWithEnrollments>>> {
    StudentRepo::find_by_id(&state.pool, id, false)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    let input = request.into_input()?;
    ensure_unique_identity(&state.pool, &input, Some(id)).await?;

    StudentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    let student = StudentRepo::find_with_enrollments(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    tracing::info!(student_id = %id, "Student updated");

    Ok(Json(
        ApiResponse::data(student).with_message("Student updated successfully"),
    ))
}

/// DELETE /api/v1/students/{id}
///
/// Soft-deletes the student and removes its enrollments.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !StudentRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(student_id = %id, "Student deleted");
    Ok(Json(ApiResponse::message("Student deleted successfully")))
}

/// Email and document number must be unique among live students other than
/// `current`.
async fn ensure_unique_identity(
    pool: &DbPool,
    input: &StudentInput,
    current: Option<DbId>,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if StudentRepo::email_taken(pool, &input.email, current).await? {
        already_taken("email", &mut errors);
    }
    if StudentRepo::document_taken(pool, &input.document_number, current).await? {
        already_taken("document_number", &mut errors);
    }
    Ok(errors.into_result()?)
}
