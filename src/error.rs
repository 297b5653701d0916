//! Error types for strategy tree construction

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, MastermindError>;

/// Errors raised by the library
///
/// Running out of guess budget is not an error: builders return `Ok(None)`.
#[derive(Error, Debug)]
pub enum MastermindError {
    /// Malformed code, color, or score input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unknown strategy, bad depth, malformed socket address
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Size accounting mismatch while assembling a tree node
    #[error("Problem size inconsistency: calculated {calculated}, expected {expected}")]
    Integrity { calculated: usize, expected: usize },

    /// Unreadable or stale cache file; recovered inside the cache layer
    #[error("Corrupt cache file: {0}")]
    CacheCorruption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
