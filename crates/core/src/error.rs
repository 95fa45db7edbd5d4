//! Error types for sw-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for sw-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sw-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid glob pattern in the included file list
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or provider error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPattern(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Config(_) | Error::TomlParse(_) => 2,          // UsageError
            Error::Network(_) => 3,                               // NetworkError
            Error::Auth(_) => 4,                                  // AuthError
            Error::NotFound(_) => 5,                              // NotFound
            Error::Conflict(_) => 6,                              // Conflict
            _ => 1,                                               // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPattern("[".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_error_is_general() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::Conflict("bucket exists".into());
        assert_eq!(err.to_string(), "Conflict: bucket exists");

        let err = Error::InvalidPattern("a[".into());
        assert_eq!(err.to_string(), "Invalid pattern: a[");
    }
}
