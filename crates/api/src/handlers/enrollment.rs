//! Handlers for the `/enrollments` resource.
//!
//! Writes run field validation first, then check that both references point
//! at live rows and that the (student, course) pair is free. The reference
//! check and the write share a transaction that share-locks the student and
//! course rows, so neither can be soft-deleted in between. The unique
//! constraint still backs the pair check for concurrent writers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use school_core::enrollment::{ensure_unique_enrollment, EnrollmentInput, EnrollmentRequest};
use school_core::error::FieldErrors;
use school_core::pagination::{clamp_page, Paginated, PAGE_SIZE};
use school_core::status::EnrollmentStatus;
use school_core::types::DbId;
use school_core::validation::missing_reference;
use school_db::models::enrollment::EnrollmentDetail;
use school_db::repositories::EnrollmentRepo;
use school_db::DbPool;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query::EnrollmentListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const ENTITY: &str = "Enrollment";

/// GET /api/v1/enrollments
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<EnrollmentListParams>,
) -> AppResult<Json<ApiResponse<Paginated<EnrollmentDetail>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EnrollmentStatus::parse)
        .transpose()?;
    let page = clamp_page(params.page);
    let enrollments = EnrollmentRepo::list_paginated(&state.pool, status, page, PAGE_SIZE).await?;
    Ok(Json(ApiResponse::data(enrollments)))
}

/// POST /api/v1/enrollments
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EnrollmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<EnrollmentDetail>>)> {
    let input = request.into_input()?;

    let mut tx = state.pool.begin().await?;
    check_relations(&mut tx, &input, None).await?;
    let enrollment = EnrollmentRepo::create(&mut *tx, &input).await?;
    tx.commit().await?;
    tracing::info!(
        enrollment_id = %enrollment.id,
        student_id = %enrollment.student_id,
        course_id = %enrollment.course_id,
        "Enrollment created",
    );

    let detail = load_detail(&state.pool, enrollment.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(detail).with_message("Enrollment created successfully")),
    ))
}

/// GET /api/v1/enrollments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<EnrollmentDetail>>> {
    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(ApiResponse::data(detail)))
}

/// PUT /api/v1/enrollments/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(request): ApiJson<EnrollmentRequest>,
) -> AppResult<Json<ApiResponse<EnrollmentDetail>>> {
    EnrollmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    let input = request.into_input()?;

    let mut tx = state.pool.begin().await?;
    check_relations(&mut tx, &input, Some(id)).await?;
    EnrollmentRepo::update(&mut *tx, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    tx.commit().await?;
    tracing::info!(enrollment_id = %id, status = %input.status, "Enrollment updated");

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(
        ApiResponse::data(detail).with_message("Enrollment updated successfully"),
    ))
}

/// DELETE /api/v1/enrollments/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !EnrollmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(enrollment_id = %id, "Enrollment deleted");
    Ok(Json(ApiResponse::message("Enrollment deleted successfully")))
}

/// Both references must be live, and no other enrollment may hold the pair.
/// `current` is the enrollment being updated. The referenced rows stay
/// locked until `conn`'s transaction ends.
async fn check_relations(
    conn: &mut PgConnection,
    input: &EnrollmentInput,
    current: Option<DbId>,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    let (student_live, course_live) =
        EnrollmentRepo::lock_parents(&mut *conn, input.student_id, input.course_id).await?;
    if !student_live {
        missing_reference("student_id", "student", &mut errors);
    }
    if !course_live {
        missing_reference("course_id", "course", &mut errors);
    }

    let existing =
        EnrollmentRepo::find_id_by_pair(&mut *conn, input.student_id, input.course_id).await?;
    ensure_unique_enrollment(existing, current, &mut errors);

    Ok(errors.into_result()?)
}

async fn load_detail(pool: &DbPool, id: DbId) -> AppResult<EnrollmentDetail> {
    EnrollmentRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))
}
