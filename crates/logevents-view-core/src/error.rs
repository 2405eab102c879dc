//! Error types for the LogEvents dashboard view.
//!
//! Rendering is infallible for any well-formed payload; the only failures are a page
//! shell that lacks one of the expected containers and payloads that are not JSON of the
//! expected shape.

use thiserror::Error;

/// Result type alias for dashboard view operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the dashboard view
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Page shell errors
    // ==========================================================================
    #[error("Page region not found: #{0}")]
    MissingRegion(String),

    #[error("Page region #{0} is not an input element")]
    NotAnInput(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    // ==========================================================================
    // Input errors
    // ==========================================================================
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-readable category, used by the WASM boundary and CLI output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::MissingRegion(_) => "MISSING_REGION",
            Self::NotAnInput(_) => "NOT_AN_INPUT",
            Self::Dom(_) => "DOM_ERROR",
            Self::Payload(_) => "INVALID_PAYLOAD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_region_names_the_container() {
        let err = Error::MissingRegion("loggers".to_string());
        assert_eq!(err.to_string(), "Page region not found: #loggers");
        assert_eq!(err.error_type(), "MISSING_REGION");
    }

    #[test]
    fn shell_errors_have_distinct_type_codes() {
        let codes = [
            Error::MissingRegion("events".into()).error_type(),
            Error::NotAnInput("level".into()).error_type(),
            Error::Dom("detached".into()).error_type(),
        ];
        assert_eq!(codes, ["MISSING_REGION", "NOT_AN_INPUT", "DOM_ERROR"]);
    }

    #[test]
    fn payload_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: Error = serde_err.into();
        assert_eq!(err.error_type(), "INVALID_PAYLOAD");
        assert!(err.to_string().starts_with("Invalid payload:"));
    }
}
