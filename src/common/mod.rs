//! Low-level utilities shared by the filter
//!
//! Linear-algebra helpers and the angle/coordinate collaborators consumed
//! (but not owned) by the estimator.

pub mod geometry;
pub mod linalg;
