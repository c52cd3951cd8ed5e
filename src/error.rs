//! Error types for simdlanes operations.
//!
//! Most misuse is rejected by the type system before any arithmetic runs. The
//! variants here cover the checks that can only happen when a configuration is
//! chosen dynamically (a lane count read from a config file, scalar data of
//! arbitrary length) so callers can handle them instead of panicking.

use std::fmt;

use crate::op::ArithOp;

/// Errors that can occur while configuring or feeding vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// The (element type, lane count, backend) combination is incompatible.
    Configuration {
        /// Backend tag name.
        backend: &'static str,
        /// Element type name.
        scalar: &'static str,
        /// The lane count that was requested.
        lanes: usize,
        /// Human-readable error message.
        message: String,
    },
    /// The backend does not implement the requested operation for this element type.
    Unsupported {
        /// Backend tag name.
        backend: &'static str,
        /// Element type name.
        scalar: &'static str,
        /// The rejected operation.
        op: ArithOp,
    },
    /// A scalar sequence has the wrong length for the lane count.
    Length {
        /// Number of scalars provided.
        len: usize,
        /// Lane count of the target vector type.
        lanes: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::Configuration {
                backend,
                scalar,
                lanes,
                message,
            } => write!(
                f,
                "Invalid vector configuration: {} (backend: {}, scalar: {}, lanes: {})",
                message, backend, scalar, lanes
            ),
            VectorError::Unsupported { backend, scalar, op } => write!(
                f,
                "Unsupported operation: {} is not available for {} on the {} backend",
                op.label(),
                scalar,
                backend
            ),
            VectorError::Length {
                len,
                lanes,
                message,
            } => write!(
                f,
                "Invalid scalar length: {} (got {} scalars for {} lanes)",
                message, len, lanes
            ),
        }
    }
}

impl std::error::Error for VectorError {}

/// Result type alias for simdlanes operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Creates a configuration error.
pub fn configuration_error(
    backend: &'static str,
    scalar: &'static str,
    lanes: usize,
    message: impl Into<String>,
) -> VectorError {
    VectorError::Configuration {
        backend,
        scalar,
        lanes,
        message: message.into(),
    }
}

/// Creates an unsupported-operation error.
pub fn unsupported_error(backend: &'static str, scalar: &'static str, op: ArithOp) -> VectorError {
    VectorError::Unsupported { backend, scalar, op }
}

/// Creates a length error.
pub fn length_error(len: usize, lanes: usize, message: impl Into<String>) -> VectorError {
    VectorError::Length {
        len,
        lanes,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let error = configuration_error("avx", "f64", 6, "lane count must be a multiple of 4");
        let display = format!("{}", error);
        assert!(display.contains("Invalid vector configuration"));
        assert!(display.contains("backend: avx"));
        assert!(display.contains("scalar: f64"));
        assert!(display.contains("lanes: 6"));
        assert!(display.contains("multiple of 4"));
    }

    #[test]
    fn test_unsupported_error_display() {
        let error = unsupported_error("avx", "Complex<f64>", ArithOp::Multiply);
        let display = format!("{}", error);
        assert!(display.contains("Unsupported operation"));
        assert!(display.contains("multiply"));
        assert!(display.contains("Complex<f64>"));
        assert!(display.contains("avx backend"));
    }

    #[test]
    fn test_length_error_display() {
        let error = length_error(10, 4, "length must be a multiple of the lane count");
        let display = format!("{}", error);
        assert!(display.contains("Invalid scalar length"));
        assert!(display.contains("got 10 scalars for 4 lanes"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = length_error(10, 4, "test");
        let error2 = length_error(10, 4, "test");
        let error3 = length_error(12, 8, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = unsupported_error("generic", "f64", ArithOp::Divide);

        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
