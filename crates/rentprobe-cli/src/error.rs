//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// rentprobe library error
    #[error("{0}")]
    Probe(#[from] rentprobe::ProbeError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// A load test finished but broke its thresholds
    #[error("Load test failed: {}", violations.join("; "))]
    ThresholdsViolated {
        /// One line per broken threshold
        violations: Vec<String>,
    },

    /// Feature compiled out of this binary
    #[error("{feature} support not enabled. Rebuild with --features {feature}")]
    FeatureDisabled {
        /// Cargo feature name
        feature: &'static str,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad duration");
        assert!(err.to_string().contains("Invalid argument"));
        assert!(err.to_string().contains("bad duration"));
    }

    #[test]
    fn test_probe_error_is_transparent() {
        let probe = rentprobe::normalize("Wellington", &rentprobe::LOCATIONS).unwrap_err();
        let err: CliError = probe.into();
        assert!(err.to_string().starts_with("Unsupported location"));
    }

    #[test]
    fn test_thresholds_joined() {
        let err = CliError::ThresholdsViolated {
            violations: vec!["p95 too high".to_string(), "errors".to_string()],
        };
        assert_eq!(err.to_string(), "Load test failed: p95 too high; errors");
    }

    #[test]
    fn test_feature_disabled() {
        let err = CliError::FeatureDisabled { feature: "browser" };
        assert!(err.to_string().contains("--features browser"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }
}
