//! Runtime configuration for the forecasting pipeline

use crate::error::{ForecastError, Result};
use forecast_math::NelderMeadConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minimum number of prices accepted by default
pub const DEFAULT_MIN_OBSERVATIONS: usize = 30;

/// Conventional count of trading days per year
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Returns are modeled in percent units
pub const PERCENT_SCALE: f64 = 100.0;

/// Tunable constants of the pipeline.
///
/// Every field has a default, so a TOML file only needs to name the values it
/// overrides:
///
/// ```toml
/// min_observations = 60
///
/// [optimizer]
/// max_iterations = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Shortest price series the pipeline will fit
    pub min_observations: usize,
    /// Periods per year used for annualization
    pub periods_per_year: u32,
    /// Multiplier applied to log returns before fitting
    pub return_scale: f64,
    /// Silence diagnostics emitted while a model is being fitted
    pub suppress_fit_diagnostics: bool,
    /// Stopping rules for maximum-likelihood estimation
    pub optimizer: NelderMeadConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            return_scale: PERCENT_SCALE,
            suppress_fit_diagnostics: true,
            optimizer: NelderMeadConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ForecastConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the constants describe a usable pipeline
    pub fn validate(&self) -> Result<()> {
        // Two returns are the least the standard-deviation fallback can use.
        if self.min_observations < 3 {
            return Err(ForecastError::ConfigError(format!(
                "min_observations must be at least 3, got {}",
                self.min_observations
            )));
        }
        if self.periods_per_year == 0 {
            return Err(ForecastError::ConfigError(
                "periods_per_year must be greater than zero".to_string(),
            ));
        }
        if !(self.return_scale.is_finite() && self.return_scale > 0.0) {
            return Err(ForecastError::ConfigError(format!(
                "return_scale must be a positive number, got {}",
                self.return_scale
            )));
        }
        self.optimizer
            .validate()
            .map_err(|e| ForecastError::ConfigError(e.to_string()))
    }
}
