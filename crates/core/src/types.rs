/// All primary keys are UUIDs issued by the hosted Postgres layer.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
