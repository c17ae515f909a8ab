//! Error types for the price_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The series is absent or shorter than the configured floor
    #[error("Not enough data")]
    InsufficientData { needed: usize, got: usize },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model order the estimator cannot handle
    #[error("Invalid model order: {0}")]
    InvalidOrder(String),

    /// Estimation stopped before meeting its tolerances
    #[error("Model did not converge: {0}")]
    Convergence(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error reading CSV price data
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
