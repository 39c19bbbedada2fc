//! HTTP handlers, one module per resource.

pub mod course;
pub mod enrollment;
pub mod report;
pub mod student;
