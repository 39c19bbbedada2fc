//! Row models and the composite shapes returned with eager-loaded relations.
//!
//! Inserts and updates take the validated inputs from `school_core`
//! (`StudentInput`, `CourseInput`, `EnrollmentInput`) directly, so this module
//! only holds what comes back out of the database.

pub mod course;
pub mod enrollment;
pub mod report;
pub mod student;
