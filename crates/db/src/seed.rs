//! Demo data for a fresh database: seven courses (one inactive), five
//! students and nine enrollments across every status.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use school_core::types::{new_id, DbId};

/// name, description, duration_hours, price (cents), max_students, status
const COURSES: &[(&str, &str, i32, i64, i32, &str)] = &[
    (
        "English Basics",
        "English for beginners: core vocabulary, essential grammar and simple conversation.",
        120, 45000, 15, "active",
    ),
    (
        "Intermediate English",
        "For students with basic English, deepening grammar and building fluency.",
        150, 55000, 12, "active",
    ),
    (
        "Advanced English",
        "Business English, certification preparation and fluent conversation.",
        180, 65000, 10, "active",
    ),
    (
        "Spanish Basics",
        "Introduction to Spanish focused on everyday communication and Hispanic culture.",
        100, 40000, 15, "active",
    ),
    (
        "Intermediate Spanish",
        "Deeper Spanish study through literature and advanced conversation.",
        130, 50000, 12, "active",
    ),
    (
        "French Basics",
        "Introductory French covering pronunciation, essential vocabulary and culture.",
        110, 48000, 12, "active",
    ),
    (
        "German Basics",
        "Introduction to German with structured grammar and technical vocabulary.",
        140, 52000, 10, "inactive",
    ),
];

/// name, email, phone, birth_date, document_number, address, city, state, zip_code
const STUDENTS: &[(&str, &str, &str, &str, &str, &str, &str, &str, &str)] = &[
    (
        "Ana Silva", "ana.silva@email.com", "(11) 99999-1111", "1995-05-15",
        "123.456.789-01", "Rua das Flores, 123", "São Paulo", "SP", "01234-567",
    ),
    (
        "Carlos Santos", "carlos.santos@email.com", "(11) 99999-2222", "1988-08-22",
        "234.567.890-12", "Av. Paulista, 456", "São Paulo", "SP", "01310-100",
    ),
    (
        "Maria Oliveira", "maria.oliveira@email.com", "(21) 99999-3333", "1992-12-03",
        "345.678.901-23", "Rua Copacabana, 789", "Rio de Janeiro", "RJ", "22070-011",
    ),
    (
        "Pedro Costa", "pedro.costa@email.com", "(31) 99999-4444", "1990-03-18",
        "456.789.012-34", "Rua da Liberdade, 321", "Belo Horizonte", "MG", "30112-000",
    ),
    (
        "Fernanda Almeida", "fernanda.almeida@email.com", "(47) 99999-5555", "1993-07-09",
        "567.890.123-45", "Rua das Palmeiras, 654", "Florianópolis", "SC", "88010-120",
    ),
];

/// student email, course name, start_date, price_paid (cents), status
const ENROLLMENTS: &[(&str, &str, &str, i64, &str)] = &[
    ("ana.silva@email.com", "English Basics", "2024-01-15", 45000, "active"),
    ("ana.silva@email.com", "Spanish Basics", "2024-02-01", 40000, "active"),
    ("carlos.santos@email.com", "Intermediate English", "2024-01-20", 55000, "active"),
    ("carlos.santos@email.com", "French Basics", "2024-02-15", 48000, "active"),
    ("maria.oliveira@email.com", "Advanced English", "2024-01-10", 65000, "completed"),
    ("maria.oliveira@email.com", "Intermediate Spanish", "2024-02-20", 50000, "active"),
    ("pedro.costa@email.com", "English Basics", "2024-01-25", 30000, "cancelled"),
    ("fernanda.almeida@email.com", "French Basics", "2024-02-05", 48000, "active"),
    ("fernanda.almeida@email.com", "Intermediate English", "2024-02-10", 55000, "completed"),
];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub courses: usize,
    pub students: usize,
    pub enrollments: usize,
}

/// Insert the demo data in one transaction, unless any student (live or
/// deleted) already exists. Returns `None` when seeding was skipped.
pub async fn seed_demo_data(pool: &PgPool) -> Result<Option<SeedCounts>, sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(existing, "Students present, skipping demo seed");
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    let mut course_ids: HashMap<&str, DbId> = HashMap::new();
    for &(name, description, duration_hours, price_cents, max_students, status) in COURSES {
        let id = new_id();
        sqlx::query(
            "INSERT INTO courses
                (id, name, description, duration_hours, price, max_students, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(duration_hours)
        .bind(Decimal::new(price_cents, 2))
        .bind(max_students)
        .bind(status)
        .execute(&mut *tx)
        .await?;
        course_ids.insert(name, id);
    }

    let mut student_ids: HashMap<&str, DbId> = HashMap::new();
    for &(name, email, phone, birth_date, document, address, city, state, zip) in STUDENTS {
        let id = new_id();
        sqlx::query(
            "INSERT INTO students
                (id, name, email, phone, birth_date, document_number, address, city, state, zip_code)
             VALUES ($1, $2, $3, $4, $5::date, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(birth_date)
        .bind(document)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(zip)
        .execute(&mut *tx)
        .await?;
        student_ids.insert(email, id);
    }

    let mut enrollments = 0;
    for &(email, course, start_date, price_cents, status) in ENROLLMENTS {
        let (Some(student_id), Some(course_id)) = (student_ids.get(email), course_ids.get(course))
        else {
            tracing::warn!(email, course, "Demo enrollment references unknown row, skipped");
            continue;
        };
        sqlx::query(
            "INSERT INTO enrollments (id, student_id, course_id, start_date, price_paid, status)
             VALUES ($1, $2, $3, $4::date, $5, $6)",
        )
        .bind(new_id())
        .bind(student_id)
        .bind(course_id)
        .bind(start_date)
        .bind(Decimal::new(price_cents, 2))
        .bind(status)
        .execute(&mut *tx)
        .await?;
        enrollments += 1;
    }

    tx.commit().await?;

    let counts = SeedCounts {
        courses: course_ids.len(),
        students: student_ids.len(),
        enrollments,
    };
    tracing::info!(?counts, "Demo data seeded");
    Ok(Some(counts))
}
