//! Error handling utilities for stores

use sqlx::Error as SqlxError;
use voice_core::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StoreError(e.to_string())
}

/// Convert a filesystem error to DomainError
pub fn map_io_error(e: std::io::Error) -> DomainError {
    DomainError::StoreError(e.to_string())
}

/// Convert a serialization error to DomainError
pub fn map_json_error(e: serde_json::Error) -> DomainError {
    DomainError::StoreError(format!("failed to encode totals document: {e}"))
}

/// A stored counter does not fit the domain's unsigned seconds
pub fn negative_seconds(value: i64) -> DomainError {
    DomainError::CorruptData(format!("negative seconds in store: {value}"))
}

/// The delta is too large for the database column
pub fn delta_out_of_range(delta: u64) -> DomainError {
    DomainError::ValidationError(format!("delta of {delta} seconds is out of range"))
}
