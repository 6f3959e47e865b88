//! Error types for the filter
//!
//! Numerical failure paths (Cholesky on a non-positive-definite covariance,
//! singular innovation covariance) surface as explicit errors rather than
//! propagating NaN through the state.

use std::fmt;

/// Errors that can occur while processing a measurement
#[derive(Debug, Clone)]
pub enum FilterError {
    /// Matrix inversion failed (singular matrix)
    SingularMatrix {
        /// Description of which matrix failed
        context: String,
    },

    /// Cholesky decomposition failed on a covariance that should be
    /// positive definite; usually indicates filter divergence or a badly
    /// tuned noise configuration
    NotPositiveDefinite {
        /// Description of which covariance failed
        context: String,
    },

    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "Lidar measurement")
        context: String,
    },

    /// A measurement contained NaN or infinite values
    NonFiniteMeasurement {
        /// Description of the offending measurement
        context: String,
    },

    /// A measurement timestamp moved backwards
    OutOfOrderMeasurement {
        /// Timestamp of the last processed measurement, microseconds
        last_us: i64,
        /// Timestamp of the rejected measurement, microseconds
        received_us: i64,
    },

    /// Configuration error
    Configuration {
        /// Description of the configuration issue
        description: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::SingularMatrix { context } => {
                write!(f, "Matrix inversion failed: {}", context)
            }
            FilterError::NotPositiveDefinite { context } => {
                write!(f, "Covariance not positive definite: {}", context)
            }
            FilterError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            FilterError::NonFiniteMeasurement { context } => {
                write!(f, "Non-finite measurement: {}", context)
            }
            FilterError::OutOfOrderMeasurement { last_us, received_us } => {
                write!(
                    f,
                    "Out-of-order measurement: last processed t={} us, received t={} us",
                    last_us, received_us
                )
            }
            FilterError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
        }
    }
}

impl std::error::Error for FilterError {}
