//! The forecasting pipeline: validate, transform, fit, annualize, assemble

use crate::annualize::{annualize, Annualized};
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::forecasters::{forecast_mean, forecast_volatility, Estimate};
use crate::models::arima::ArimaModel;
use crate::models::garch::GarchModel;
use crate::models::ForecastModel;
use crate::orders::{ArimaOrder, GarchOrder};
use crate::output::{assemble, model_label, ForecastOutput, ForecastResult};
use crate::request::ForecastRequest;
use crate::validation::validate_prices;
use forecast_math::returns::log_returns;
use tracing::{debug, info};

/// Everything a run produced, including whether each model actually fitted
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub result: ForecastResult,
    /// One-period mean estimate in scaled-return units
    pub mean: Estimate,
    /// One-period volatility estimate in scaled-return units
    pub volatility: Estimate,
    /// Number of returns the models saw
    pub observations: usize,
}

/// Stateless forecaster configured once and run per series
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Scaled log returns of a validated series
    pub fn transform_returns(&self, prices: &[f64]) -> Result<Vec<f64>> {
        Ok(log_returns(prices, self.config.return_scale)?)
    }

    /// Forecast with ARIMA and GARCH models of the given orders
    pub fn run(
        &self,
        prices: Option<&[f64]>,
        arima: ArimaOrder,
        garch: GarchOrder,
    ) -> Result<ForecastResult> {
        self.run_detailed(prices, arima, garch)
            .map(|report| report.result)
    }

    /// Like [`run`](Self::run), keeping the fitted/degraded outcome of each model
    pub fn run_detailed(
        &self,
        prices: Option<&[f64]>,
        arima: ArimaOrder,
        garch: GarchOrder,
    ) -> Result<ForecastReport> {
        let mean_model = ArimaModel::new(arima).with_optimizer(self.config.optimizer);
        let vol_model = GarchModel::new(garch).with_optimizer(self.config.optimizer);
        self.run_with_models(prices, &mean_model, &vol_model, model_label(&arima, &garch))
    }

    /// Run the pipeline with arbitrary mean and variance models.
    ///
    /// `used_model` is reported as given.
    pub fn run_with_models<M, V>(
        &self,
        prices: Option<&[f64]>,
        mean_model: &M,
        vol_model: &V,
        used_model: String,
    ) -> Result<ForecastReport>
    where
        M: ForecastModel,
        V: ForecastModel,
    {
        let prices = validate_prices(prices, self.config.min_observations)?;
        let returns = self.transform_returns(prices)?;
        debug!(observations = returns.len(), "returns computed");

        let suppress = self.config.suppress_fit_diagnostics;
        let mean = forecast_mean(mean_model, &returns, suppress)?;
        let volatility = forecast_volatility(vol_model, &returns, suppress)?;

        let annualized: Annualized = annualize(
            mean.value(),
            volatility.value(),
            self.config.return_scale,
            self.config.periods_per_year,
        );
        info!(
            used_model = %used_model,
            mean_fitted = mean.is_fitted(),
            volatility_fitted = volatility.is_fitted(),
            annualized_return = annualized.annualized_return,
            annualized_volatility = annualized.annualized_volatility,
            "forecast complete"
        );

        Ok(ForecastReport {
            result: assemble(annualized, used_model),
            mean,
            volatility,
            observations: returns.len(),
        })
    }

    /// Run a decoded request and always produce a boundary value
    pub fn run_request(&self, request: &ForecastRequest) -> ForecastOutput {
        self.run(request.prices.as_deref(), request.arima, request.garch)
            .into()
    }

    /// Decode the three JSON arguments and run, never failing outward
    pub fn run_json_args(&self, prices: &str, arima: &str, garch: &str) -> ForecastOutput {
        match ForecastRequest::from_json_args(prices, arima, garch) {
            Ok(request) => self.run_request(&request),
            Err(err) => ForecastOutput::failure(err.to_string()),
        }
    }
}
