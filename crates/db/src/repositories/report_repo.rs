//! Read-only aggregation queries behind the report endpoints.
//!
//! Every ranking covers live rows only, defaults missing sums to zero through
//! LEFT JOINs, and breaks ties on the lowest id.

use sqlx::PgPool;
use school_core::report::{
    average_revenue_per_student, DashboardStats, MONTHLY_REVENUE_WINDOW_MONTHS,
    POPULAR_COURSES_LIMIT,
};
use school_core::types::Money;

use crate::models::report::{
    CourseRevenue, CourseStudentCount, Dashboard, MonthlyRevenue, PopularCourse,
    StudentInvestment, Summary,
};
use crate::repositories::{course_repo, qualify, student_repo};

/// Provides the report aggregations.
pub struct ReportRepo;

impl ReportRepo {
    /// Every live student with the total paid across its enrollments,
    /// highest first.
    pub async fn total_by_student(pool: &PgPool) -> Result<Vec<StudentInvestment>, sqlx::Error> {
        sqlx::query_as::<_, StudentInvestment>(&investment_query(None))
            .fetch_all(pool)
            .await
    }

    /// Every live course with its number of `active` enrollments, highest
    /// first.
    pub async fn courses_with_most_students(
        pool: &PgPool,
    ) -> Result<Vec<CourseStudentCount>, sqlx::Error> {
        sqlx::query_as::<_, CourseStudentCount>(&student_count_query(true, None))
            .fetch_all(pool)
            .await
    }

    /// Every live course with its revenue and enrollment count (any status),
    /// highest revenue first.
    pub async fn revenue_per_course(pool: &PgPool) -> Result<Vec<CourseRevenue>, sqlx::Error> {
        let query = format!(
            "SELECT {cols},
                    COALESCE(SUM(e.price_paid), 0)::NUMERIC(12,2) AS total_revenue,
                    COUNT(e.id) AS total_enrollments
             FROM courses c
             LEFT JOIN enrollments e ON e.course_id = c.id
             WHERE c.deleted_at IS NULL
             GROUP BY c.id
             ORDER BY total_revenue DESC, c.id ASC",
            cols = qualify(course_repo::COLUMNS, "c"),
        );
        sqlx::query_as::<_, CourseRevenue>(&query).fetch_all(pool).await
    }

    /// Whole-school totals plus the most popular course and top investor.
    pub async fn summary(pool: &PgPool) -> Result<Summary, sqlx::Error> {
        let stats = Self::stats(pool).await?;
        let most_popular_course =
            sqlx::query_as::<_, CourseStudentCount>(&student_count_query(false, Some(1)))
                .fetch_optional(pool)
                .await?;
        let top_investor = sqlx::query_as::<_, StudentInvestment>(&investment_query(Some(1)))
            .fetch_optional(pool)
            .await?;

        Ok(Summary {
            total_students: stats.total_students,
            total_courses: stats.total_courses,
            total_enrollments: stats.total_enrollments,
            active_enrollments: stats.active_enrollments,
            average_revenue_per_student: average_revenue_per_student(
                stats.total_revenue,
                stats.total_students,
            ),
            total_revenue: stats.total_revenue,
            most_popular_course,
            top_investor,
        })
    }

    /// Dashboard counters, popularity ranking, monthly revenue and status
    /// breakdown.
    pub async fn dashboard(pool: &PgPool) -> Result<Dashboard, sqlx::Error> {
        let stats = Self::stats(pool).await?;
        let popular_courses = Self::popular_courses(pool, POPULAR_COURSES_LIMIT).await?;
        let monthly_revenue = Self::monthly_revenue(pool, MONTHLY_REVENUE_WINDOW_MONTHS).await?;
        Ok(Dashboard::from_parts(stats, popular_courses, monthly_revenue))
    }

    /// Headline counters in a single round trip.
    pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        let (
            total_students,
            total_courses,
            total_enrollments,
            total_revenue,
            active_enrollments,
            completed_enrollments,
            cancelled_enrollments,
        ): (i64, i64, i64, Money, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM students WHERE deleted_at IS NULL),
                (SELECT COUNT(*) FROM courses WHERE deleted_at IS NULL),
                COUNT(*),
                COALESCE(SUM(price_paid), 0)::NUMERIC(12,2),
                COUNT(*) FILTER (WHERE status = 'active'),
                COUNT(*) FILTER (WHERE status = 'completed'),
                COUNT(*) FILTER (WHERE status = 'cancelled')
             FROM enrollments",
        )
        .fetch_one(pool)
        .await?;

        Ok(DashboardStats {
            total_students,
            total_courses,
            total_enrollments,
            total_revenue,
            active_enrollments,
            completed_enrollments,
            cancelled_enrollments,
        })
    }

    /// The `limit` live courses with the most enrollments of any status.
    pub async fn popular_courses(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<PopularCourse>, sqlx::Error> {
        sqlx::query_as::<_, PopularCourse>(
            "SELECT c.id, c.name, COUNT(e.id) AS enrollments_count
             FROM courses c
             LEFT JOIN enrollments e ON e.course_id = c.id
             WHERE c.deleted_at IS NULL
             GROUP BY c.id, c.name
             ORDER BY enrollments_count DESC, c.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Revenue per `YYYY-MM` of enrollment creation over the trailing
    /// `months`, oldest month first. Months without enrollments are absent.
    pub async fn monthly_revenue(
        pool: &PgPool,
        months: i32,
    ) -> Result<Vec<MonthlyRevenue>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyRevenue>(
            "SELECT TO_CHAR(created_at, 'YYYY-MM') AS month,
                    SUM(price_paid)::NUMERIC(12,2) AS revenue,
                    COUNT(*) AS enrollments
             FROM enrollments
             WHERE created_at >= NOW() - make_interval(months => $1)
             GROUP BY month
             ORDER BY month ASC",
        )
        .bind(months)
        .fetch_all(pool)
        .await
    }
}

fn investment_query(limit: Option<i64>) -> String {
    let limit = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
    format!(
        "SELECT {cols},
                COALESCE(SUM(e.price_paid), 0)::NUMERIC(12,2) AS total_invested
         FROM students s
         LEFT JOIN enrollments e ON e.student_id = s.id
         WHERE s.deleted_at IS NULL
         GROUP BY s.id
         ORDER BY total_invested DESC, s.id ASC{limit}",
        cols = qualify(student_repo::COLUMNS, "s"),
    )
}

/// `active_only` moves the status filter into the join predicate so courses
/// without active enrollments still appear with a zero count.
fn student_count_query(active_only: bool, limit: Option<i64>) -> String {
    let status = if active_only {
        " AND e.status = 'active'"
    } else {
        ""
    };
    let limit = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();
    format!(
        "SELECT {cols}, COUNT(e.id) AS student_count
         FROM courses c
         LEFT JOIN enrollments e ON e.course_id = c.id{status}
         WHERE c.deleted_at IS NULL
         GROUP BY c.id
         ORDER BY student_count DESC, c.id ASC{limit}",
        cols = qualify(course_repo::COLUMNS, "c"),
    )
}
