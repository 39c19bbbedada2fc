//! Request extractors with envelope-shaped rejections.
//!
//! Axum's stock extractors reject with `text/plain` bodies. These wrappers
//! route every rejection through [`AppError`] so clients always get the
//! JSON error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use school_core::error::CoreError;

use crate::error::{AppError, RESOURCE_NOT_FOUND};

/// Drop-in replacement for [`axum::Json`] whose rejections render through
/// [`AppError`].
///
/// A body that is valid JSON but has the wrong shape becomes a 422
/// validation error; anything else (syntax error, wrong content type) is a
/// 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY => Err(
                AppError::Core(CoreError::Validation(rejection.body_text())),
            ),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Path parameters. A segment that does not parse as the expected type
/// (e.g. `/students/42` where ids are UUIDs) cannot name any row, so it is
/// reported as a 404.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(PathRejection::FailedToDeserializePathParams(err)) => {
                tracing::debug!(error = %err.body_text(), "Unparseable path parameter");
                Err(AppError::NotFound(RESOURCE_NOT_FOUND.to_string()))
            }
            Err(rejection) => Err(AppError::InternalError(rejection.body_text())),
        }
    }
}

/// Query string parameters; a malformed value is a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
