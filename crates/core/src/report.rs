//! Report math that sits on top of the aggregation queries.
//!
//! The database computes sums and counts; this module derives the values
//! that need exact rounding rules (average revenue, status percentages) and
//! owns the zeroed dashboard figures served when aggregation fails.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::status::EnrollmentStatus;
use crate::types::Money;

/// Number of courses in the dashboard's popularity ranking.
pub const POPULAR_COURSES_LIMIT: i64 = 5;

/// Trailing window, in months, of the dashboard revenue series.
pub const MONTHLY_REVENUE_WINDOW_MONTHS: i32 = 6;

/// Total revenue divided by student count, rounded half away from zero to
/// two places. Zero when there are no students.
pub fn average_revenue_per_student(total_revenue: Money, total_students: i64) -> Money {
    if total_students <= 0 {
        return Decimal::new(0, 2);
    }
    let mut average = total_revenue
        .checked_div(Decimal::from(total_students))
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    average.rescale(2);
    average
}

/// Share of `count` in `total` as a percentage rounded to one decimal.
/// Zero when `total` is zero.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// One row of the dashboard's enrollment status breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: EnrollmentStatus,
    pub count: i64,
    pub percentage: f64,
}

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
    pub total_revenue: Money,
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
    pub cancelled_enrollments: i64,
}

impl DashboardStats {
    /// All counters zero, revenue `0.00`.
    pub fn zeroed() -> Self {
        Self {
            total_students: 0,
            total_courses: 0,
            total_enrollments: 0,
            total_revenue: Decimal::new(0, 2),
            active_enrollments: 0,
            completed_enrollments: 0,
            cancelled_enrollments: 0,
        }
    }

    /// Per-status counts with their share of all enrollments, in the order
    /// active, completed, cancelled.
    pub fn status_breakdown(&self) -> Vec<StatusShare> {
        let total = self.total_enrollments;
        [
            (EnrollmentStatus::Active, self.active_enrollments),
            (EnrollmentStatus::Completed, self.completed_enrollments),
            (EnrollmentStatus::Cancelled, self.cancelled_enrollments),
        ]
        .into_iter()
        .map(|(status, count)| StatusShare {
            status,
            count,
            percentage: percentage(count, total),
        })
        .collect()
    }
}
