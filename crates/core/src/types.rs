/// All primary keys are application-generated UUIDv7 values, so ordering by
/// id follows creation order.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (birth dates, enrollment start dates).
pub type Date = chrono::NaiveDate;

/// Monetary amounts. Stored as `NUMERIC(10,2)`.
pub type Money = rust_decimal::Decimal;

/// Generate a fresh primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}
