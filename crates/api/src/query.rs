//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination (`?page=`). The page size is fixed.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

/// Query parameters for `GET /enrollments`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentListParams {
    pub page: Option<i64>,
    /// Restrict the list to one status (`active`, `cancelled`, `completed`).
    pub status: Option<String>,
}
