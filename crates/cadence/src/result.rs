//! Result and error types for Cadence.
//!
//! The timing calculations themselves are infallible; these errors are
//! raised at the boundaries where caller-supplied configuration enters the
//! engine (timing documents, easing text, keyframe lists, files).

use thiserror::Error;

/// Result type for Cadence operations
pub type CadenceResult<T> = Result<T, CadenceError>;

/// Errors that can occur while building engine inputs
#[derive(Debug, Error)]
pub enum CadenceError {
    /// A timing field failed validation
    #[error("Invalid timing: {field} {message}")]
    InvalidTiming {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Easing text could not be parsed
    #[error("Invalid easing function: {input:?}")]
    InvalidEasing {
        /// The rejected text
        input: String,
    },

    /// A keyframe list is malformed
    #[error("Invalid keyframes: {message}")]
    InvalidKeyframes {
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

impl CadenceError {
    /// Create an invalid timing error
    #[must_use]
    pub fn invalid_timing(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidTiming {
            field,
            message: message.into(),
        }
    }

    /// Create an invalid easing error
    #[must_use]
    pub fn invalid_easing(input: impl Into<String>) -> Self {
        Self::InvalidEasing {
            input: input.into(),
        }
    }

    /// Create an invalid keyframes error
    #[must_use]
    pub fn invalid_keyframes(message: impl Into<String>) -> Self {
        Self::InvalidKeyframes {
            message: message.into(),
        }
    }
}
