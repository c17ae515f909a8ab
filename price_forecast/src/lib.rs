//! # Price Forecast
//!
//! Forecasts the annualized expected return and volatility of a price series.
//!
//! ## Features
//!
//! - Input validation and log-return transform
//! - ARIMA(p,d,q) mean model fitted by conditional sum of squares
//! - Zero-mean GARCH(p,q) variance model fitted by maximum likelihood
//! - Sample-mean / sample-deviation fallbacks whenever a model fails
//! - Historical portfolio metrics and a Monte Carlo value projection
//! - A JSON file store for saved portfolio settings
//! - `forecast` and `simulate` command line tools emitting JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use price_forecast::{ArimaOrder, ForecastConfig, ForecastPipeline, GarchOrder};
//!
//! # fn main() -> Result<(), price_forecast::ForecastError> {
//! let prices: Vec<f64> = (0..40).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
//!
//! let pipeline = ForecastPipeline::new(ForecastConfig::default());
//! let result = pipeline.run(Some(&prices), ArimaOrder::new(1, 0, 1), GarchOrder::new(1, 1))?;
//!
//! assert_eq!(result.used_model, "ARIMA(1,0,1) + GARCH(1,1)");
//! assert!(result.annualized_volatility.is_finite());
//! # Ok(())
//! # }
//! ```

pub mod annualize;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod forecasters;
pub mod metrics;
pub mod models;
pub mod orders;
pub mod output;
pub mod pipeline;
pub mod portfolios;
pub mod request;
pub mod simulation;
pub mod validation;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::error::{ForecastError, Result};
pub use crate::forecasters::Estimate;
pub use crate::models::{Forecast, ForecastModel, TrainedForecastModel};
pub use crate::orders::{ArimaOrder, GarchOrder};
pub use crate::output::{ForecastOutput, ForecastResult};
pub use crate::pipeline::{ForecastPipeline, ForecastReport};
pub use crate::request::ForecastRequest;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
