//! Error types for `loginguard-core`.
//!
//! Fallible operations in the core library return [`GuardResult<T>`],
//! which is an alias for `Result<T, GuardError>`.

use std::path::PathBuf;

/// Unified error type for the limiter and its configuration.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The identity has reached the failure threshold inside the window.
    ///
    /// Hosts must surface this exactly like a bad-credentials error.
    #[error("authentication rate limited for {identity}")]
    RateLimited { identity: String },

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// The configuration file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to read the configuration file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `loginguard-core`.
pub type GuardResult<T> = Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_names_identity() {
        let err = GuardError::RateLimited {
            identity: "alice".to_string(),
        };
        assert_eq!(err.to_string(), "authentication rate limited for alice");
    }

    #[test]
    fn invalid_config_displays_message() {
        let err = GuardError::InvalidConfig("max_attempts must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid config: max_attempts must be at least 1"
        );
    }

    #[test]
    fn not_found_displays_path() {
        let err = GuardError::NotFound(PathBuf::from("/etc/loginguard.toml"));
        assert_eq!(err.to_string(), "path not found: /etc/loginguard.toml");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: GuardError = io_err.into();
        assert!(matches!(err, GuardError::Io(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
