//! Numerical constants used throughout the filter
//!
//! These constants are tuning-sensitive and intentionally separate from the
//! user-configurable noise parameters in [`crate::filter::UkfConfig`].

/// State dimension: `[px, py, v, yaw, yaw_rate]`
pub const STATE_DIM: usize = 5;

/// Augmented state dimension: state plus longitudinal-acceleration and
/// yaw-acceleration process-noise components
pub const AUG_DIM: usize = STATE_DIM + 2;

/// Number of sigma points drawn from the augmented distribution (`2n + 1`)
pub const SIGMA_COUNT: usize = 2 * AUG_DIM + 1;

/// Sigma-point spreading parameter
///
/// The standard choice `lambda = 3 - n` trades sigma-point distance against
/// higher-order truncation error of the unscented transform.
pub const LAMBDA: f64 = 3.0 - AUG_DIM as f64;

/// Yaw-rate magnitude below which the CTRV propagation switches to its
/// straight-line limit
///
/// The curved-trajectory form divides by the yaw rate; below this threshold
/// the closed-form limit `dt * v * cos/sin(yaw)` is used instead. The two
/// branches agree to well within measurement noise at the threshold, so the
/// switch introduces no observable discontinuity.
pub const YAW_RATE_EPSILON: f64 = 1e-3;

/// Minimum range used when dividing by range in the radar projection
///
/// A target passing through the sensor origin makes the range-rate
/// projection ill-conditioned; the divisor is clamped to this value rather
/// than letting the division blow up.
pub const MIN_RADAR_RANGE: f64 = 1e-4;

/// Measurement timestamps are integer microseconds; prediction works in
/// seconds
pub const MICROS_PER_SECOND: f64 = 1e6;

/// Diagonal value of the initial state covariance
///
/// The identity covariance expresses uniformly low confidence in the first
/// state fix. This strongly affects early-convergence behavior; raising it
/// makes the filter trust the first few measurements more.
pub const INITIAL_STATE_VARIANCE: f64 = 1.0;
