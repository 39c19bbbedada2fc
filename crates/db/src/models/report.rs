//! Rows returned by the aggregation queries in `ReportRepo`.

use serde::Serialize;
use sqlx::FromRow;
use school_core::report::{DashboardStats, StatusShare};
use school_core::types::{DbId, Money};

use crate::models::course::Course;
use crate::models::student::Student;

/// A live student with the sum of `price_paid` over all its enrollments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentInvestment {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub student: Student,
    pub total_invested: Money,
}

/// A live course with a count of enrolled students.
///
/// The courses ranking counts only `active` enrollments; the summary's most
/// popular course counts every status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseStudentCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub student_count: i64,
}

/// A live course with the revenue and number of its enrollments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseRevenue {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub total_revenue: Money,
    pub total_enrollments: i64,
}

/// Whole-school headline figures.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_students: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
    pub active_enrollments: i64,
    pub total_revenue: Money,
    pub average_revenue_per_student: Money,
    pub most_popular_course: Option<CourseStudentCount>,
    pub top_investor: Option<StudentInvestment>,
}

/// Dashboard entry for one of the most enrolled courses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PopularCourse {
    pub id: DbId,
    pub name: String,
    pub enrollments_count: i64,
}

/// Revenue for one `YYYY-MM` bucket of enrollment creation dates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Money,
    pub enrollments: i64,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub popular_courses: Vec<PopularCourse>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub enrollment_status: Vec<StatusShare>,
}

impl Dashboard {
    pub fn from_parts(
        stats: DashboardStats,
        popular_courses: Vec<PopularCourse>,
        monthly_revenue: Vec<MonthlyRevenue>,
    ) -> Self {
        let enrollment_status = stats.status_breakdown();
        Self {
            stats,
            popular_courses,
            monthly_revenue,
            enrollment_status,
        }
    }

    /// The payload served when aggregation fails: zero counters, empty
    /// rankings, and every status listed at zero.
    pub fn empty() -> Self {
        Self::from_parts(DashboardStats::zeroed(), Vec::new(), Vec::new())
    }
}
