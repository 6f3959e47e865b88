//! Filter configuration
//!
//! Noise standard deviations and sensor-enable flags, fixed at filter
//! construction and read-only afterward.

use serde::{Deserialize, Serialize};

use crate::filter::errors::FilterError;

/// UKF configuration: sensor gating and noise standard deviations
///
/// The defaults are tuned for a vehicle-scale target (bicycle dataset):
/// moderate longitudinal and yaw acceleration noise, centimeter-level lidar
/// noise and typical automotive-radar noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkfConfig {
    /// Process lidar measurements; a disabled sensor's measurements are
    /// ignored entirely, both at initialization and in steady state
    pub use_lidar: bool,
    /// Process radar measurements; same gating as `use_lidar`
    pub use_radar: bool,

    /// Process noise: longitudinal acceleration standard deviation, m/s^2
    pub std_a: f64,
    /// Process noise: yaw acceleration standard deviation, rad/s^2
    pub std_yawdd: f64,

    /// Lidar measurement noise: x position standard deviation, m
    pub std_laspx: f64,
    /// Lidar measurement noise: y position standard deviation, m
    pub std_laspy: f64,

    /// Radar measurement noise: range standard deviation, m
    pub std_radr: f64,
    /// Radar measurement noise: bearing standard deviation, rad
    pub std_radphi: f64,
    /// Radar measurement noise: range-rate standard deviation, m/s
    pub std_radrd: f64,
}

impl Default for UkfConfig {
    fn default() -> Self {
        Self {
            use_lidar: true,
            use_radar: true,
            std_a: 1.5,
            std_yawdd: 0.57,
            std_laspx: 0.15,
            std_laspy: 0.15,
            std_radr: 0.3,
            std_radphi: 0.03,
            std_radrd: 0.3,
        }
    }
}

impl UkfConfig {
    /// Validate the configuration
    ///
    /// # Errors
    /// [`FilterError::Configuration`] if every sensor is disabled or any
    /// noise standard deviation is not strictly positive and finite.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.use_lidar && !self.use_radar {
            return Err(FilterError::Configuration {
                description: "at least one sensor must be enabled".to_string(),
            });
        }

        let stds = [
            ("std_a", self.std_a),
            ("std_yawdd", self.std_yawdd),
            ("std_laspx", self.std_laspx),
            ("std_laspy", self.std_laspy),
            ("std_radr", self.std_radr),
            ("std_radphi", self.std_radphi),
            ("std_radrd", self.std_radrd),
        ];
        for (name, value) in stds {
            if !(value.is_finite() && value > 0.0) {
                return Err(FilterError::Configuration {
                    description: format!("{} must be positive and finite, got {}", name, value),
                });
            }
        }

        Ok(())
    }
}
