//! Return-series models behind a train-then-forecast interface

use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Path of forecasts, one value per period ahead
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    values: Vec<f64>,
}

impl Forecast {
    /// Wrap a forecast path; an empty path is rejected
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::ForecastingError(
                "A forecast needs at least one period".to_string(),
            ));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of periods covered
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// The one-step-ahead value
    pub fn next(&self) -> f64 {
        self.values[0]
    }
}

/// A model fitted to one series
pub trait TrainedForecastModel: Debug {
    /// Forecast the next `horizons` periods
    fn forecast(&self, horizons: usize) -> Result<Forecast>;

    fn name(&self) -> &str;
}

/// A model configuration that can be fitted
pub trait ForecastModel: Debug {
    type Trained: TrainedForecastModel;

    /// Fit the model to a return series
    fn train(&self, data: &[f64]) -> Result<Self::Trained>;

    fn name(&self) -> &str;
}

pub mod arima;
pub mod garch;
