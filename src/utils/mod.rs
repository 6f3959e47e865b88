//! Shared numerical utilities and constants

pub mod constants;
