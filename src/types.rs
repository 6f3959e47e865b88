//! Measurement and state-estimate types
//!
//! State ordering throughout the crate: `[px, py, v, yaw, yaw_rate]`.
//! Uses runtime dimensions (DVector/DMatrix); everything here is small and
//! fixed-size in practice.

use nalgebra::{DMatrix, DVector};

use crate::filter::FilterError;

/// Index of the x position in the state vector
pub const IDX_PX: usize = 0;
/// Index of the y position in the state vector
pub const IDX_PY: usize = 1;
/// Index of the speed (velocity magnitude) in the state vector
pub const IDX_V: usize = 2;
/// Index of the heading angle in the state vector
pub const IDX_YAW: usize = 3;
/// Index of the yaw rate in the state vector
pub const IDX_YAW_RATE: usize = 4;

/// Sensor modality of a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// Position-only sensor: `[px, py]`
    Lidar,
    /// Range/bearing/range-rate sensor: `[range, bearing, range_rate]`
    Radar,
}

impl SensorType {
    /// Dimension of this sensor's measurement space
    #[inline]
    pub fn measurement_dim(&self) -> usize {
        match self {
            SensorType::Lidar => 2,
            SensorType::Radar => 3,
        }
    }
}

/// A single timestamped sensor reading
///
/// Immutable input to [`crate::UnscentedKalmanFilter::process_measurement`];
/// the filter does not retain it beyond the call.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Which sensor produced this reading
    pub sensor_type: SensorType,
    /// Raw values: `[px, py]` for lidar, `[range, bearing, range_rate]`
    /// for radar
    pub raw: DVector<f64>,
    /// Capture time in integer microseconds, monotonically non-decreasing
    /// within a run
    pub timestamp_us: i64,
}

impl Measurement {
    /// Create a lidar (position) measurement
    pub fn lidar(px: f64, py: f64, timestamp_us: i64) -> Self {
        Self {
            sensor_type: SensorType::Lidar,
            raw: DVector::from_vec(vec![px, py]),
            timestamp_us,
        }
    }

    /// Create a radar (range/bearing/range-rate) measurement
    pub fn radar(range: f64, bearing: f64, range_rate: f64, timestamp_us: i64) -> Self {
        Self {
            sensor_type: SensorType::Radar,
            raw: DVector::from_vec(vec![range, bearing, range_rate]),
            timestamp_us,
        }
    }

    /// Validate dimensions and finiteness of the raw values
    ///
    /// # Errors
    /// [`FilterError::DimensionMismatch`] if the raw vector length does not
    /// match the sensor type, [`FilterError::NonFiniteMeasurement`] if any
    /// raw value is NaN or infinite.
    pub fn validate(&self) -> Result<(), FilterError> {
        let expected = self.sensor_type.measurement_dim();
        if self.raw.len() != expected {
            return Err(FilterError::DimensionMismatch {
                expected,
                actual: self.raw.len(),
                context: format!("{:?} measurement", self.sensor_type),
            });
        }
        if self.raw.iter().any(|v| !v.is_finite()) {
            return Err(FilterError::NonFiniteMeasurement {
                context: format!("{:?} measurement at t={}", self.sensor_type, self.timestamp_us),
            });
        }
        Ok(())
    }
}

/// Filter output after a processed measurement
#[derive(Debug, Clone)]
pub struct StateEstimate {
    /// Timestamp of the measurement that produced this estimate,
    /// microseconds
    pub timestamp_us: i64,
    /// Posterior state mean `[px, py, v, yaw, yaw_rate]`
    pub mean: DVector<f64>,
    /// Posterior state covariance (5x5, symmetric PSD)
    pub covariance: DMatrix<f64>,
    /// NIS of the update that produced this estimate; `None` for the
    /// initializing measurement, which performs no update
    pub nis: Option<f64>,
}
