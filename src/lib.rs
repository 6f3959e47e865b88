/*!
# ctrv-ukf - Unscented Kalman Filter over the CTRV motion model

Rust implementation of a single-target Unscented Kalman Filter (UKF)
fusing asynchronous lidar and radar measurements over a constant turn
rate and velocity magnitude (CTRV) motion model.

## Features

- Sigma-point prediction with process-noise state augmentation
- Lidar (position) and radar (range/bearing/range-rate) updates through
  one shared measurement-model abstraction
- Normalized Innovation Squared (NIS) consistency statistics per sensor
- Explicit error reporting for singular or non-positive-definite
  covariances instead of silent NaN propagation

## Modules

- [`filter`] - The UKF itself: configuration, prediction, updates, errors
- [`types`] - Measurement and state-estimate types
- [`common`] - Low-level utilities: linear algebra, angle/coordinate helpers
- [`utils`] - Numerical constants

## Example

```rust
use ctrv_ukf::{Measurement, UkfConfig, UnscentedKalmanFilter};

let mut ukf = UnscentedKalmanFilter::new(UkfConfig::default()).unwrap();

// The first measurement initializes the state, later ones predict + update.
let init = Measurement::lidar(1.0, 2.0, 0);
ukf.process_measurement(&init).unwrap();

let next = Measurement::radar(2.83, 0.785, 0.0, 100_000);
let estimate = ukf.process_measurement(&next).unwrap().unwrap();
assert_eq!(estimate.mean.len(), 5);
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// The UKF: configuration, prediction, measurement updates, errors
pub mod filter;

/// Measurement and state-estimate types
pub mod types;

/// Low-level utilities (linear algebra, angles, coordinate conversion)
pub mod common;

/// Numerical constants
pub mod utils;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use types::{Measurement, SensorType, StateEstimate};

// Filter and configuration
pub use filter::{UkfConfig, UnscentedKalmanFilter};

// Errors
pub use filter::FilterError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
