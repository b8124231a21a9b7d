/// Surrogate identifiers are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A flat resource record as it travels between the datastore, the API and
/// the console: column name to scalar JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;
