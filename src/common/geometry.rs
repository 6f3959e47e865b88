//! Angle normalization and polar/Cartesian coordinate conversion
//!
//! These are the two pure collaborators of the estimator: radar measurements
//! arrive in polar form and the state space has a circular heading component,
//! so every angular difference must be wrapped before it enters a covariance
//! accumulation.

use std::f64::consts::PI;

use crate::utils::constants::MIN_RADAR_RANGE;

/// Wrap an angle into `(-pi, pi]`
///
/// Total (defined for all finite inputs) and idempotent:
/// `normalize_angle(normalize_angle(a)) == normalize_angle(a)`.
pub fn normalize_angle(angle: f64) -> f64 {
    // rem_euclid lands in [0, 2*pi); shifting the upper half down yields
    // (-pi, pi] with +pi mapped to itself.
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

/// Convert a polar radar reading to Cartesian position and speed
///
/// # Arguments
/// * `range` - Radial distance to the target
/// * `bearing` - Angle from the sensor x-axis, radians
/// * `range_rate` - Radial velocity component
///
/// # Returns
/// `(px, py, v)` where `v` is the speed implied by projecting the range rate
/// along the bearing. Only the radial velocity component is observable from
/// a single radar return, so `v` is a lower bound on the true speed.
pub fn polar_to_cartesian(range: f64, bearing: f64, range_rate: f64) -> (f64, f64, f64) {
    let px = range * bearing.cos();
    let py = range * bearing.sin();

    let vx = range_rate * bearing.cos();
    let vy = range_rate * bearing.sin();
    let v = vx.hypot(vy);

    (px, py, v)
}

/// Convert Cartesian position and velocity to a polar radar reading
///
/// # Returns
/// `(range, bearing, range_rate)`. The range-rate divisor is clamped to
/// [`MIN_RADAR_RANGE`] so a target at the sensor origin produces a finite
/// (if meaningless) range rate instead of a division blow-up.
pub fn cartesian_to_polar(px: f64, py: f64, vx: f64, vy: f64) -> (f64, f64, f64) {
    let range = px.hypot(py);
    let bearing = py.atan2(px);
    let range_rate = (px * vx + py * vy) / range.max(MIN_RADAR_RANGE);

    (range, bearing, range_rate)
}
