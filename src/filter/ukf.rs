//! The UKF estimator
//!
//! Owns all filter state and exposes one entry point per incoming
//! measurement. The first measurement initializes the state; every later one
//! predicts forward by the elapsed time and updates with the matching
//! sensor model.

use nalgebra::{DMatrix, DVector};

use crate::common::geometry::polar_to_cartesian;
use crate::filter::config::UkfConfig;
use crate::filter::errors::FilterError;
use crate::filter::measurement_models::{LidarModel, MeasurementModel, RadarModel};
use crate::filter::prediction::{self, PredictedState};
use crate::filter::update::{self, UpdatedState};
use crate::types::{Measurement, SensorType, StateEstimate, IDX_PX, IDX_PY, IDX_V};
use crate::utils::constants::{
    INITIAL_STATE_VARIANCE, MICROS_PER_SECOND, SIGMA_COUNT, STATE_DIM,
};

/// Unscented Kalman Filter over the CTRV motion model
///
/// Single-threaded and non-reentrant: each `process_measurement` call
/// mutates the owned state in place and must complete before the next call.
/// Callers that receive measurements concurrently must serialize access
/// (one filter instance per tracked object).
#[derive(Debug, Clone)]
pub struct UnscentedKalmanFilter {
    config: UkfConfig,
    lidar_model: LidarModel,
    radar_model: RadarModel,

    initialized: bool,
    last_timestamp_us: i64,

    /// State mean `[px, py, v, yaw, yaw_rate]`
    state: DVector<f64>,
    /// State covariance
    covariance: DMatrix<f64>,
    /// Propagated sigma points from the most recent prediction
    sigma_points: DMatrix<f64>,
    /// Sigma-point weights from the most recent prediction
    weights: DVector<f64>,

    nis_lidar: f64,
    nis_radar: f64,
}

impl UnscentedKalmanFilter {
    /// Create a filter from a validated configuration
    ///
    /// # Errors
    /// [`FilterError::Configuration`] for an invalid configuration.
    pub fn new(config: UkfConfig) -> Result<Self, FilterError> {
        config.validate()?;

        let lidar_model = LidarModel::new(config.std_laspx, config.std_laspy);
        let radar_model = RadarModel::new(config.std_radr, config.std_radphi, config.std_radrd);

        Ok(Self {
            config,
            lidar_model,
            radar_model,
            initialized: false,
            last_timestamp_us: 0,
            state: DVector::zeros(STATE_DIM),
            covariance: DMatrix::identity(STATE_DIM, STATE_DIM) * INITIAL_STATE_VARIANCE,
            sigma_points: DMatrix::zeros(STATE_DIM, SIGMA_COUNT),
            weights: prediction::sigma_weights(),
            nis_lidar: 0.0,
            nis_radar: 0.0,
        })
    }

    /// Process one measurement: initialize, or predict and update
    ///
    /// Returns `Ok(None)` when the measurement's sensor is disabled in the
    /// configuration; the filter state and reference timestamp are left
    /// untouched. Any error likewise leaves the filter exactly as it was
    /// (updates are all-or-nothing).
    ///
    /// # Errors
    /// See [`FilterError`]; malformed measurements, out-of-order timestamps
    /// and numerical singularities all surface here.
    pub fn process_measurement(
        &mut self,
        measurement: &Measurement,
    ) -> Result<Option<StateEstimate>, FilterError> {
        measurement.validate()?;

        if !self.sensor_enabled(measurement.sensor_type) {
            log::debug!(
                "Ignoring {:?} measurement at t={} us (sensor disabled)",
                measurement.sensor_type,
                measurement.timestamp_us
            );
            return Ok(None);
        }

        if !self.initialized {
            self.initialize(measurement);
            return Ok(Some(self.estimate(None)));
        }

        let dt_us = measurement.timestamp_us - self.last_timestamp_us;
        if dt_us < 0 {
            return Err(FilterError::OutOfOrderMeasurement {
                last_us: self.last_timestamp_us,
                received_us: measurement.timestamp_us,
            });
        }
        let dt = dt_us as f64 / MICROS_PER_SECOND;

        // Compute the full cycle into locals and commit only on success.
        // dt = 0 degenerates to a no-op prediction that still refreshes the
        // sigma-point basis for the update.
        let predicted = prediction::predict(&self.state, &self.covariance, &self.config, dt)?;
        let updated = match measurement.sensor_type {
            SensorType::Lidar => update::update(&predicted, &self.lidar_model, &measurement.raw)?,
            SensorType::Radar => update::update(&predicted, &self.radar_model, &measurement.raw)?,
        };

        self.commit(measurement, predicted, updated);
        Ok(Some(self.estimate(Some(match measurement.sensor_type {
            SensorType::Lidar => self.nis_lidar,
            SensorType::Radar => self.nis_radar,
        }))))
    }

    /// Current state mean `[px, py, v, yaw, yaw_rate]`
    pub fn state(&self) -> &DVector<f64> {
        &self.state
    }

    /// Current state covariance
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// NIS of the most recent lidar update
    pub fn nis_lidar(&self) -> f64 {
        self.nis_lidar
    }

    /// NIS of the most recent radar update
    pub fn nis_radar(&self) -> f64 {
        self.nis_radar
    }

    /// Whether the first measurement has been absorbed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The configuration this filter was built with
    pub fn config(&self) -> &UkfConfig {
        &self.config
    }

    fn sensor_enabled(&self, sensor_type: SensorType) -> bool {
        match sensor_type {
            SensorType::Lidar => self.config.use_lidar,
            SensorType::Radar => self.config.use_radar,
        }
    }

    /// Set the state from the first measurement; no prediction or update
    ///
    /// Lidar fixes position directly and leaves speed at zero (a single
    /// position fix carries no velocity information); radar converts the
    /// polar reading to a Cartesian position and speed.
    fn initialize(&mut self, measurement: &Measurement) {
        let (px, py, v) = match measurement.sensor_type {
            SensorType::Lidar => (measurement.raw[0], measurement.raw[1], 0.0),
            SensorType::Radar => {
                polar_to_cartesian(measurement.raw[0], measurement.raw[1], measurement.raw[2])
            }
        };

        self.state = DVector::zeros(STATE_DIM);
        self.state[IDX_PX] = px;
        self.state[IDX_PY] = py;
        self.state[IDX_V] = v;
        self.covariance = DMatrix::identity(STATE_DIM, STATE_DIM) * INITIAL_STATE_VARIANCE;
        self.last_timestamp_us = measurement.timestamp_us;
        self.initialized = true;

        log::debug!(
            "Initialized from {:?} at t={} us: px={:.3} py={:.3} v={:.3}",
            measurement.sensor_type,
            measurement.timestamp_us,
            px,
            py,
            v
        );
    }

    fn commit(
        &mut self,
        measurement: &Measurement,
        predicted: PredictedState,
        updated: UpdatedState,
    ) {
        self.state = updated.mean;
        self.covariance = updated.covariance;
        self.sigma_points = predicted.sigma_points;
        self.weights = predicted.weights;
        match measurement.sensor_type {
            SensorType::Lidar => self.nis_lidar = updated.nis,
            SensorType::Radar => self.nis_radar = updated.nis,
        }
        self.last_timestamp_us = measurement.timestamp_us;

        log::trace!(
            "{:?} update at t={} us: nis={:.3}",
            measurement.sensor_type,
            measurement.timestamp_us,
            updated.nis
        );
    }

    fn estimate(&self, nis: Option<f64>) -> StateEstimate {
        StateEstimate {
            timestamp_us: self.last_timestamp_us,
            mean: self.state.clone(),
            covariance: self.covariance.clone(),
            nis,
        }
    }
}
