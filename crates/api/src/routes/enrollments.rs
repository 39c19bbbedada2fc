use axum::routing::get;
use axum::Router;

use crate::handlers::enrollment;
use crate::state::AppState;

/// Routes mounted at `/enrollments`.
///
/// ```text
/// GET    /        -> list (?page=&status=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(enrollment::list).post(enrollment::create))
        .route(
            "/{id}",
            get(enrollment::get_by_id)
                .put(enrollment::update)
                .delete(enrollment::delete),
        )
}
