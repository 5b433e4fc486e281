//! Error types for OxiFlate operations.
//!
//! The compressor reports three kinds of failure:
//!
//! - **Parameter errors**: an argument was out of range. Nothing changed, the
//!   caller may correct the argument and retry.
//! - **Stream-state errors**: the call protocol was violated (for example
//!   input supplied after the stream was finished). Nothing changed.
//! - **Internal errors**: an internal invariant no longer holds. The session
//!   must be discarded or reset.
//!
//! Running out of output space is *not* an error; it is reported through
//! [`CompressStatus::NeedsOutput`](crate::traits::CompressStatus::NeedsOutput).

use std::io;
use thiserror::Error;

/// The main error type for OxiFlate operations.
#[derive(Debug, Error)]
pub enum OxiFlateError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A parameter was outside its valid range.
    #[error("Invalid parameter {name}: {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: i64,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// The call violates the stream protocol in the current state.
    #[error("Stream state error: {message}")]
    StreamState {
        /// Description of the violation.
        message: String,
    },

    /// An internal invariant was violated; the session is unusable.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },
}

/// Result type alias for OxiFlate operations.
pub type Result<T> = std::result::Result<T, OxiFlateError>;

impl OxiFlateError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, value: i64, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            expected,
        }
    }

    /// Create a stream state error.
    pub fn stream_state(message: impl Into<String>) -> Self {
        Self::StreamState {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the session that produced this error must be discarded.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Whether the same call may succeed once the caller corrects its
    /// arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl Clone for OxiFlateError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::InvalidParameter {
                name,
                value,
                expected,
            } => Self::invalid_parameter(name, *value, expected),
            Self::StreamState { message } => Self::stream_state(message.clone()),
            Self::Internal { message } => Self::internal(message.clone()),
        }
    }
}

impl From<OxiFlateError> for io::Error {
    fn from(err: OxiFlateError) -> Self {
        match err {
            OxiFlateError::Io(e) => e,
            OxiFlateError::InvalidParameter { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiFlateError::invalid_parameter("level", 12, "0..=9");
        assert!(err.to_string().contains("level"));
        assert!(err.to_string().contains("12"));

        let err = OxiFlateError::stream_state("input after finish");
        assert!(err.to_string().contains("input after finish"));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(OxiFlateError::internal("corrupt").is_fatal());
        assert!(!OxiFlateError::stream_state("x").is_fatal());
        assert!(OxiFlateError::invalid_parameter("level", -3, "0..=9").is_retryable());
        assert!(!OxiFlateError::stream_state("x").is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OxiFlateError = io_err.into();
        assert!(matches!(err, OxiFlateError::Io(_)));
        assert!(matches!(err.clone(), OxiFlateError::Io(_)));
    }

    #[test]
    fn test_into_io_error() {
        let io_err: io::Error = OxiFlateError::invalid_parameter("level", 10, "0..=9").into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
        let io_err: io::Error = OxiFlateError::stream_state("finished").into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(io_err.to_string().contains("finished"));
    }
}
