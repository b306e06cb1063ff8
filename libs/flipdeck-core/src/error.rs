//! Error types for flipdeck-core.

use thiserror::Error;

/// Result type alias using the core Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the deck editor, the CSV codec and card stores.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing csv column: {0}")]
    MissingColumn(&'static str),

    #[error("card not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("deck editor is locked")]
    Locked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_field() {
        let error = Error::EmptyField { field: "front" };
        assert_eq!(error.to_string(), "front must not be empty");
    }

    #[test]
    fn test_error_display_not_found() {
        let error = Error::NotFound("abc".to_string());
        assert_eq!(error.to_string(), "card not found: abc");
    }

    #[test]
    fn test_error_display_store() {
        let error = Error::Store("connection refused".to_string());
        assert_eq!(error.to_string(), "store error: connection refused");
    }
}
