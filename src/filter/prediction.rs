//! Sigma-point prediction over the CTRV motion model
//!
//! The prediction step augments the state with the two process-noise
//! components, draws `2n + 1` sigma points from the augmented distribution,
//! propagates each through the nonlinear CTRV transition and reduces the
//! propagated points back to a predicted mean and covariance.

use nalgebra::{DMatrix, DVector};

use crate::common::geometry::normalize_angle;
use crate::filter::config::UkfConfig;
use crate::filter::errors::FilterError;
use crate::types::{IDX_PX, IDX_PY, IDX_V, IDX_YAW, IDX_YAW_RATE};
use crate::utils::constants::{AUG_DIM, LAMBDA, SIGMA_COUNT, STATE_DIM, YAW_RATE_EPSILON};

/// Result of one prediction step
///
/// The propagated sigma points and weights are kept because the measurement
/// update immediately following the prediction reuses them as its basis.
#[derive(Debug, Clone)]
pub struct PredictedState {
    /// Predicted state mean (5)
    pub mean: DVector<f64>,
    /// Predicted state covariance (5x5)
    pub covariance: DMatrix<f64>,
    /// Propagated sigma points (5 x 15)
    pub sigma_points: DMatrix<f64>,
    /// Sigma-point weights (15)
    pub weights: DVector<f64>,
}

/// Predict the state distribution forward by `dt` seconds
///
/// # Errors
/// [`FilterError::NotPositiveDefinite`] if the augmented covariance has no
/// Cholesky factor, which indicates divergence or a degenerate noise
/// configuration.
pub fn predict(
    mean: &DVector<f64>,
    covariance: &DMatrix<f64>,
    config: &UkfConfig,
    dt: f64,
) -> Result<PredictedState, FilterError> {
    let (aug_mean, aug_covariance) = augment(mean, covariance, config);

    let chol = aug_covariance
        .clone()
        .cholesky()
        .ok_or_else(|| FilterError::NotPositiveDefinite {
            context: "augmented covariance in prediction".to_string(),
        })?;

    let aug_sigma = generate_sigma_points(&aug_mean, &chol.l());

    let mut sigma_points = DMatrix::zeros(STATE_DIM, SIGMA_COUNT);
    for i in 0..SIGMA_COUNT {
        let propagated = ctrv_transition(&aug_sigma.column(i).into_owned(), dt);
        sigma_points.set_column(i, &propagated);
    }

    let weights = sigma_weights();
    let (mean, covariance) = reduce(&sigma_points, &weights);

    Ok(PredictedState {
        mean,
        covariance,
        sigma_points,
        weights,
    })
}

/// Form the augmented mean and covariance
///
/// The state mean gets two zero process-noise components appended; the
/// covariance becomes block-diagonal with `diag(std_a^2, std_yawdd^2)`.
pub fn augment(
    mean: &DVector<f64>,
    covariance: &DMatrix<f64>,
    config: &UkfConfig,
) -> (DVector<f64>, DMatrix<f64>) {
    let mut aug_mean = DVector::zeros(AUG_DIM);
    aug_mean.rows_mut(0, STATE_DIM).copy_from(mean);

    let mut aug_covariance = DMatrix::zeros(AUG_DIM, AUG_DIM);
    aug_covariance
        .view_mut((0, 0), (STATE_DIM, STATE_DIM))
        .copy_from(covariance);
    aug_covariance[(STATE_DIM, STATE_DIM)] = config.std_a * config.std_a;
    aug_covariance[(STATE_DIM + 1, STATE_DIM + 1)] = config.std_yawdd * config.std_yawdd;

    (aug_mean, aug_covariance)
}

/// Generate `2n + 1` sigma points from a mean and a lower Cholesky factor
///
/// Column 0 is the mean itself; columns `i + 1` and `i + 1 + n` are
/// `mean +/- sqrt(lambda + n) * L.column(i)`.
pub fn generate_sigma_points(mean: &DVector<f64>, chol_l: &DMatrix<f64>) -> DMatrix<f64> {
    let n = mean.len();
    let spread = (LAMBDA + n as f64).sqrt();

    let mut sigma = DMatrix::zeros(n, 2 * n + 1);
    sigma.set_column(0, mean);
    for i in 0..n {
        let offset = chol_l.column(i) * spread;
        sigma.set_column(i + 1, &(mean + &offset));
        sigma.set_column(i + 1 + n, &(mean - &offset));
    }

    sigma
}

/// Propagate one augmented sigma point through the CTRV transition
///
/// For `|yaw_rate| > YAW_RATE_EPSILON` the closed-form curved-trajectory
/// update is used; below the threshold the straight-line limit avoids the
/// division by a near-zero yaw rate. The trailing two components of the
/// augmented point are the process-noise draws, folded in as additive
/// `dt`/`dt^2` terms.
pub fn ctrv_transition(aug_point: &DVector<f64>, dt: f64) -> DVector<f64> {
    let px = aug_point[IDX_PX];
    let py = aug_point[IDX_PY];
    let v = aug_point[IDX_V];
    let yaw = aug_point[IDX_YAW];
    let yawd = aug_point[IDX_YAW_RATE];
    let nu_a = aug_point[STATE_DIM];
    let nu_yawdd = aug_point[STATE_DIM + 1];

    let (mut px_p, mut py_p) = if yawd.abs() > YAW_RATE_EPSILON {
        (
            px + v / yawd * ((yaw + yawd * dt).sin() - yaw.sin()),
            py + v / yawd * (yaw.cos() - (yaw + yawd * dt).cos()),
        )
    } else {
        (px + v * dt * yaw.cos(), py + v * dt * yaw.sin())
    };

    let mut v_p = v;
    let mut yaw_p = yaw + yawd * dt;
    let mut yawd_p = yawd;

    // Process noise
    let half_dt2 = 0.5 * dt * dt;
    px_p += nu_a * half_dt2 * yaw.cos();
    py_p += nu_a * half_dt2 * yaw.sin();
    v_p += nu_a * dt;
    yaw_p += nu_yawdd * half_dt2;
    yawd_p += nu_yawdd * dt;

    DVector::from_vec(vec![px_p, py_p, v_p, yaw_p, yawd_p])
}

/// Sigma-point weights
///
/// `w_0 = lambda / (lambda + n)`, all others `1 / (2 (lambda + n))`.
/// Deterministic from the augmented dimension; recomputed per prediction,
/// which is cheap at this size.
pub fn sigma_weights() -> DVector<f64> {
    let denom = LAMBDA + AUG_DIM as f64;
    let mut weights = DVector::from_element(SIGMA_COUNT, 0.5 / denom);
    weights[0] = LAMBDA / denom;
    weights
}

/// Reduce propagated sigma points to a weighted mean and covariance
///
/// Every deviation's heading component is wrapped before it enters the
/// covariance accumulation; without this, points straddling the -pi/+pi
/// seam would blow the heading variance up.
pub fn reduce(sigma_points: &DMatrix<f64>, weights: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
    let n = sigma_points.nrows();
    let count = sigma_points.ncols();

    let mut mean = DVector::zeros(n);
    for i in 0..count {
        mean += sigma_points.column(i) * weights[i];
    }

    let mut covariance = DMatrix::zeros(n, n);
    for i in 0..count {
        let mut diff = sigma_points.column(i) - &mean;
        diff[IDX_YAW] = normalize_angle(diff[IDX_YAW]);
        covariance += &diff * diff.transpose() * weights[i];
    }

    (mean, covariance)
}
