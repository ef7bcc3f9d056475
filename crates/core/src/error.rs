//! Error types for bm-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bm-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or settings error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential variable is absent or empty
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// Filter pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Upload source does not exist
    #[error("Local file not found: {}", .0.display())]
    LocalFileNotFound(PathBuf),

    /// Upload source exists but cannot be read
    #[error("Permission denied reading local file: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or backend error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidPattern(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Network(_) => 3,                                                  // NetworkError
            Error::Auth(_) | Error::MissingCredential(_) | Error::PermissionDenied(_) => 4, // AuthError
            Error::NotFound(_) | Error::LocalFileNotFound(_) => 5,                   // NotFound
            _ => 1,                                                                  // GeneralError
        }
    }

    /// Classify a local IO error raised while reading `path`
    pub fn from_local_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::LocalFileNotFound(path.into()),
            std::io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.into()),
            _ => Error::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::MissingCredential("AWS_ACCESS_KEY_ID").exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::LocalFileNotFound("a.txt".into()).exit_code(), 5);
        assert_eq!(Error::PermissionDenied("a.txt".into()).exit_code(), 4);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_usage_error() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Invalid pattern"));
    }

    #[test]
    fn test_from_local_io_kinds() {
        let err = Error::from_local_io(std::io::ErrorKind::NotFound.into(), "/tmp/missing.csv");
        assert!(matches!(err, Error::LocalFileNotFound(ref p) if p.ends_with("missing.csv")));

        let err = Error::from_local_io(std::io::ErrorKind::PermissionDenied.into(), "/root/x");
        assert!(matches!(err, Error::PermissionDenied(_)));

        let err = Error::from_local_io(std::io::ErrorKind::InvalidData.into(), "/tmp/x");
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_display() {
        let err = Error::MissingCredential("AWS_SECRET_ACCESS_KEY");
        assert_eq!(err.to_string(), "Missing credential: AWS_SECRET_ACCESS_KEY is not set");

        let err = Error::LocalFileNotFound("/tmp/report.csv".into());
        assert_eq!(err.to_string(), "Local file not found: /tmp/report.csv");
    }
}
