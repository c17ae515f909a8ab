//! # Forecast Math
//!
//! Numerical building blocks shared by the forecasting models:
//!
//! - Scaled log-return transform
//! - Descriptive statistics (backed by `statrs`)
//! - Series differencing and integration
//! - A bounded Nelder-Mead minimizer
//! - Stationarity / invertibility reparameterization for lag polynomials

use thiserror::Error;

pub mod constraints;
pub mod differencing;
pub mod optimize;
pub mod returns;
pub mod statistics;

pub use optimize::{nelder_mead, Minimum, NelderMeadConfig};

/// Failures of the numerical routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Too few values for the requested statistic or transform
    #[error("Too few observations: {0}")]
    InsufficientData(String),

    /// Values outside the domain of the operation, such as non-positive prices
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The optimizer could not start or evaluate the objective
    #[error("Optimization failed: {0}")]
    OptimizationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
