/*!
Unscented Kalman Filter over the CTRV motion model.

The filter fuses two heterogeneous sensors:
- lidar: direct position observations
- radar: range, bearing and range rate

Both updates run through one shared sigma-point update algorithm
parameterized by a [`MeasurementModel`](measurement_models::MeasurementModel).
*/

pub mod config;
pub mod errors;
pub mod measurement_models;
pub mod prediction;
pub mod ukf;
pub mod update;

pub use config::UkfConfig;
pub use errors::FilterError;
pub use ukf::UnscentedKalmanFilter;
