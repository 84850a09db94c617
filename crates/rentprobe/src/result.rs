//! Result and error types for rentprobe.

use thiserror::Error;

/// Result type for rentprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the booking site
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Raw input was empty after trimming
    #[error("Empty {kind} input")]
    EmptyInput {
        /// Domain kind (e.g. "location")
        kind: &'static str,
    },

    /// Input did not match any canonical value or alias
    #[error("Unsupported {kind} \"{input}\". Supported values: {supported}")]
    UnsupportedValue {
        /// Domain kind (e.g. "location")
        kind: &'static str,
        /// The trimmed input
        input: String,
        /// Canonical names joined with ", "
        supported: String,
    },

    /// A dependent operation was invoked before its prerequisite
    #[error("{required} must be called before {attempted}")]
    Precondition {
        /// Operation that has to succeed first
        required: &'static str,
        /// Operation that was attempted
        attempted: &'static str,
    },

    /// No option with the requested display text appeared
    #[error("Option \"{value}\" did not appear within {timeout_ms}ms")]
    OptionNotFound {
        /// Canonical value that was searched for
        value: String,
        /// Wait budget in milliseconds
        timeout_ms: u64,
    },

    /// A widget did not open within its wait budget
    #[error("The {widget} widget did not open within {timeout_ms}ms")]
    WidgetNotOpen {
        /// Widget name
        widget: &'static str,
        /// Wait budget in milliseconds
        timeout_ms: u64,
    },

    /// Forward navigation gave up before the target month was shown
    #[error("Month {target} not reached after {attempts} forward steps (last visible: {last_visible})")]
    MonthNotReachable {
        /// Target month label
        target: String,
        /// Forward clicks performed
        attempts: u32,
        /// Last month of the final window
        last_visible: String,
    },

    /// Target month lies before the earliest visible month
    #[error("Month {target} precedes the earliest visible month {earliest}; the calendar only moves forward")]
    UnreachableMonth {
        /// Target month label
        target: String,
        /// Earliest visible month label
        earliest: String,
    },

    /// Malformed date string
    #[error("Invalid date \"{input}\": {reason}")]
    DateParse {
        /// Raw input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// End date precedes start date
    #[error("Date range end {end} is before start {start}")]
    InvalidDateRange {
        /// Start date
        start: String,
        /// End date
        end: String,
    },

    /// Passenger counts outside the allowed limits
    #[error("Invalid passenger count: {message}")]
    InvalidPassengerCount {
        /// Error message
        message: String,
    },

    /// The widget rendered something the site contract does not describe
    #[error("Unexpected widget state: {message}")]
    UnexpectedWidgetState {
        /// Error message
        message: String,
    },

    /// Read-back assertion failed
    #[error("{field} expected to contain \"{expected}\" but was \"{actual}\": {message}")]
    AssertionFailed {
        /// Field name
        field: &'static str,
        /// Expected substring
        expected: String,
        /// Actual trimmed text
        actual: String,
        /// Caller-supplied message
        message: String,
    },

    /// Driver-level wait timed out
    #[error("Timed out after {ms}ms waiting for {selector}")]
    Timeout {
        /// Selector description
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No element matched a selector
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Selector description
        selector: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser automation engine error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Availability API error
    #[error("API error: {message}")]
    Api {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Errors raised from caller input before any UI interaction
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput { .. }
                | Self::UnsupportedValue { .. }
                | Self::DateParse { .. }
                | Self::InvalidDateRange { .. }
                | Self::InvalidPassengerCount { .. }
        )
    }

    /// Errors caused by a widget never showing the expected affordance
    #[must_use]
    pub const fn is_widget_error(&self) -> bool {
        matches!(
            self,
            Self::OptionNotFound { .. }
                | Self::WidgetNotOpen { .. }
                | Self::MonthNotReachable { .. }
                | Self::UnreachableMonth { .. }
                | Self::UnexpectedWidgetState { .. }
        )
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unexpected widget state error
    #[must_use]
    pub fn widget_state(message: impl Into<String>) -> Self {
        Self::UnexpectedWidgetState {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_value_lists_supported() {
        let err = ProbeError::UnsupportedValue {
            kind: "location",
            input: "Wellington".to_string(),
            supported: "Auckland, Christchurch, Queenstown".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Wellington"));
        assert!(msg.contains("Auckland, Christchurch, Queenstown"));
        assert!(err.is_input_error());
        assert!(!err.is_widget_error());
    }

    #[test]
    fn test_precondition_names_required_operation() {
        let err = ProbeError::Precondition {
            required: "select_pickup_location",
            attempted: "select_dropoff_location",
        };
        assert_eq!(
            err.to_string(),
            "select_pickup_location must be called before select_dropoff_location"
        );
    }

    #[test]
    fn test_widget_errors_classified() {
        let err = ProbeError::WidgetNotOpen {
            widget: "calendar",
            timeout_ms: 100,
        };
        assert!(err.is_widget_error());
        assert!(err.to_string().contains("calendar"));

        let err = ProbeError::Timeout {
            selector: "css(.x)".to_string(),
            ms: 5,
        };
        assert!(!err.is_widget_error());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ProbeError = io.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
