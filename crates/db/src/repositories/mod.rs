//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod enrollment_repo;
pub mod report_repo;
pub mod student_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use report_repo::ReportRepo;
pub use student_repo::StudentRepo;

/// Prefix every column of a `COLUMNS` list with a table alias, for use in
/// joined queries.
pub(crate) fn qualify(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|column| format!("{alias}.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
