/// Entity ids are UUIDv4 strings assigned by the API layer on create.
pub type EntityId = String;

/// All timestamps are UTC. Naive timestamps are rejected at the serde
/// boundary, so everything the core compares is already normalized.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
