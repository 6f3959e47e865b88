//! Per-sensor measurement models
//!
//! Lidar and radar updates share one sigma-point update algorithm; the
//! sensor-specific parts (projection into measurement space, noise matrix,
//! which measurement rows are angles) live behind [`MeasurementModel`].

use nalgebra::{DMatrix, DVector, DVectorView};

use crate::common::geometry::cartesian_to_polar;
use crate::types::{IDX_PX, IDX_PY, IDX_V, IDX_YAW};

/// Sensor-specific half of the measurement update
pub trait MeasurementModel {
    /// Dimension of the measurement space
    fn dim(&self) -> usize;

    /// Fixed diagonal measurement-noise covariance
    fn noise(&self) -> &DMatrix<f64>;

    /// Indices of measurement rows holding angles, whose deviations must be
    /// wrapped before any covariance accumulation
    fn wrapped_rows(&self) -> &[usize];

    /// Project a predicted state sigma point into measurement space
    fn project(&self, state: DVectorView<'_, f64>) -> DVector<f64>;
}

/// Position-only sensor: identity projection on `(px, py)`
#[derive(Debug, Clone)]
pub struct LidarModel {
    noise: DMatrix<f64>,
}

impl LidarModel {
    /// Build from the per-axis position noise standard deviations
    pub fn new(std_px: f64, std_py: f64) -> Self {
        #[rustfmt::skip]
        let noise = DMatrix::from_row_slice(2, 2, &[
            std_px * std_px, 0.0,
            0.0,             std_py * std_py,
        ]);
        Self { noise }
    }
}

impl MeasurementModel for LidarModel {
    fn dim(&self) -> usize {
        2
    }

    fn noise(&self) -> &DMatrix<f64> {
        &self.noise
    }

    fn wrapped_rows(&self) -> &[usize] {
        &[]
    }

    fn project(&self, state: DVectorView<'_, f64>) -> DVector<f64> {
        DVector::from_vec(vec![state[IDX_PX], state[IDX_PY]])
    }
}

/// Range/bearing/range-rate sensor
#[derive(Debug, Clone)]
pub struct RadarModel {
    noise: DMatrix<f64>,
}

/// Measurement row holding the bearing angle
const RADAR_BEARING_ROW: [usize; 1] = [1];

impl RadarModel {
    /// Build from the range, bearing and range-rate noise standard
    /// deviations
    pub fn new(std_r: f64, std_phi: f64, std_rd: f64) -> Self {
        #[rustfmt::skip]
        let noise = DMatrix::from_row_slice(3, 3, &[
            std_r * std_r, 0.0,               0.0,
            0.0,           std_phi * std_phi, 0.0,
            0.0,           0.0,               std_rd * std_rd,
        ]);
        Self { noise }
    }
}

impl MeasurementModel for RadarModel {
    fn dim(&self) -> usize {
        3
    }

    fn noise(&self) -> &DMatrix<f64> {
        &self.noise
    }

    fn wrapped_rows(&self) -> &[usize] {
        &RADAR_BEARING_ROW
    }

    fn project(&self, state: DVectorView<'_, f64>) -> DVector<f64> {
        let v = state[IDX_V];
        let yaw = state[IDX_YAW];
        let vx = v * yaw.cos();
        let vy = v * yaw.sin();

        let (range, bearing, range_rate) =
            cartesian_to_polar(state[IDX_PX], state[IDX_PY], vx, vy);
        DVector::from_vec(vec![range, bearing, range_rate])
    }
}
