//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

/// Parse a UUID read back from a TEXT column
///
/// A malformed value is a data integrity problem, surfaced as `Internal`.
pub fn parse_column(column: &str, value: &str) -> crate::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        crate::Error::Internal(format!("Invalid UUID in column {}: {} ({})", column, value, e))
    })
}
