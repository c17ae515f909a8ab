//! ARIMA models for the conditional mean of a return series.
//!
//! Parameters are estimated by conditional Gaussian maximum likelihood, which
//! for the mean equation reduces to minimizing the conditional sum of squared
//! one-step errors. The search runs over unconstrained coordinates that map
//! onto stationary AR and invertible MA polynomials.

use crate::error::{ForecastError, Result};
use crate::models::{Forecast, ForecastModel, TrainedForecastModel};
use crate::orders::ArimaOrder;
use forecast_math::constraints::{
    constrain_invertible, constrain_stationary, unconstrain_invertible, unconstrain_stationary,
};
use forecast_math::differencing::{difference, integrate};
use forecast_math::{nelder_mead, statistics, NelderMeadConfig};
use std::f64::consts::PI;
use tracing::debug;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Requested order
    order: ArimaOrder,
    /// Stopping rules for estimation
    optimizer: NelderMeadConfig,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Fitted order
    order: ArimaOrder,
    /// Constant of the differenced series (zero when d > 0)
    intercept: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Series the model was trained on
    historical_data: Vec<f64>,
    /// Series after differencing
    differenced: Vec<f64>,
    /// Conditional one-step residuals on the differenced scale
    residuals: Vec<f64>,
    /// Mean squared residual
    residual_variance: f64,
    log_likelihood: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    /// Optimizer iterations used
    iterations: usize,
}

/// How the optimizer's parameter vector is laid out
#[derive(Debug, Clone, Copy)]
struct ParamLayout {
    has_intercept: bool,
    p: usize,
    q: usize,
}

impl ParamLayout {
    fn len(&self) -> usize {
        usize::from(self.has_intercept) + self.p + self.q
    }

    fn unpack(&self, params: &[f64]) -> (f64, Vec<f64>, Vec<f64>) {
        let offset = usize::from(self.has_intercept);
        let intercept = if self.has_intercept { params[0] } else { 0.0 };
        let ar = constrain_stationary(&params[offset..offset + self.p]);
        let ma = constrain_invertible(&params[offset + self.p..offset + self.p + self.q]);
        (intercept, ar, ma)
    }
}

/// One-step residuals of the ARMA recursion, conditioning on the first `ar.len()` values.
///
/// Residuals before the conditioning point are zero.
fn conditional_residuals(series: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut residuals = vec![0.0; series.len()];

    for t in ar.len()..series.len() {
        let mut pred = intercept;

        // AR component
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (series[t - 1 - i] - intercept);
        }

        // MA component
        for (j, theta) in ma.iter().enumerate() {
            if let Some(k) = t.checked_sub(j + 1) {
                pred += theta * residuals[k];
            }
        }

        residuals[t] = series[t] - pred;
    }

    residuals
}

/// True when all values agree to within rounding of their magnitude
fn is_constant(series: &[f64]) -> bool {
    let (lo, hi) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    hi - lo <= 1e-10 * (1.0 + lo.abs().max(hi.abs()))
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            optimizer: NelderMeadConfig::default(),
        }
    }

    /// Use custom stopping rules for estimation
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Requested order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    fn estimate(&self, differenced: &[f64], layout: ParamLayout) -> Result<(Vec<f64>, usize)> {
        let ArimaOrder { p, q, .. } = self.order;

        let mut initial = Vec::with_capacity(layout.len());
        if layout.has_intercept {
            initial.push(statistics::mean(differenced)?);
        }
        let ar_start: Vec<f64> = (0..p).map(|i| 0.1 / (i + 1) as f64).collect();
        let ma_start: Vec<f64> = (0..q).map(|i| 0.1 / (i + 1) as f64).collect();
        initial.extend(unconstrain_stationary(&ar_start)?);
        initial.extend(unconstrain_invertible(&ma_start)?);

        let objective = |params: &[f64]| {
            let (intercept, ar, ma) = layout.unpack(params);
            let residuals = conditional_residuals(differenced, intercept, &ar, &ma);
            let css: f64 = residuals[p..].iter().map(|e| e * e).sum();
            if css.is_finite() {
                css
            } else {
                f64::INFINITY
            }
        };

        let minimum = nelder_mead(objective, &initial, None, &self.optimizer)?;
        debug!(
            model = %self.name,
            iterations = minimum.iterations,
            css = minimum.value,
            converged = minimum.converged,
            "conditional sum of squares minimized"
        );

        if !minimum.converged {
            return Err(ForecastError::Convergence(format!(
                "{} stopped after {} iterations",
                self.name, minimum.iterations
            )));
        }

        Ok((minimum.point, minimum.iterations))
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(ArimaOrder::new(1, 0, 0))
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &[f64]) -> Result<TrainedArimaModel> {
        let ArimaOrder { p, d, q } = self.order;

        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Series contains non-finite values".to_string(),
            ));
        }

        // Bounds every order by the series length before any lag arithmetic.
        if p.max(d).max(q) > data.len() {
            return Err(ForecastError::InvalidOrder(format!(
                "{} is too large for {} observations",
                self.name,
                data.len()
            )));
        }

        let layout = ParamLayout {
            has_intercept: d == 0,
            p,
            q,
        };

        // Need more conditioned observations than parameters after differencing.
        let needed = d + p + layout.len() + 1;
        if data.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: data.len(),
            });
        }

        let differenced = difference(data, d);

        let (intercept, ar_coefficients, ma_coefficients, iterations) = if layout.len() == 0 {
            (0.0, Vec::new(), Vec::new(), 0)
        } else if p == 0 && q == 0 {
            // Only a constant: the least-squares estimate is the mean
            (statistics::mean(&differenced)?, Vec::new(), Vec::new(), 0)
        } else if layout.has_intercept && is_constant(&differenced) {
            // Every AR/MA coefficient fits a constant series equally well
            debug!(model = %self.name, "constant series, fitting the level only");
            (differenced[0], vec![0.0; p], vec![0.0; q], 0)
        } else {
            let (point, iterations) = self.estimate(&differenced, layout)?;
            let (intercept, ar, ma) = layout.unpack(&point);
            (intercept, ar, ma, iterations)
        };

        let residuals =
            conditional_residuals(&differenced, intercept, &ar_coefficients, &ma_coefficients);
        let effective = &residuals[p..];
        let n_eff = effective.len() as f64;
        let residual_variance = effective.iter().map(|e| e * e).sum::<f64>() / n_eff;

        let (log_likelihood, aic, bic) = if residual_variance > 0.0 {
            let ll = -0.5 * n_eff * ((2.0 * PI * residual_variance).ln() + 1.0);
            // Mean parameters plus the innovation variance
            let k = (layout.len() + 1) as f64;
            (Some(ll), Some(-2.0 * ll + 2.0 * k), Some(-2.0 * ll + k * n_eff.ln()))
        } else {
            (None, None, None)
        };

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            intercept,
            ar_coefficients,
            ma_coefficients,
            historical_data: data.to_vec(),
            differenced,
            residuals,
            residual_variance,
            log_likelihood,
            aic,
            bic,
            iterations,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizons: usize) -> Result<Forecast> {
        if self.historical_data.is_empty() {
            return Err(ForecastError::ForecastingError(
                "Model has not been fitted to data".to_string(),
            ));
        }

        let mut extended = self.differenced.clone();
        let mut residuals = self.residuals.clone();

        for _ in 0..horizons {
            let t = extended.len();
            let mut pred = self.intercept;

            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                if let Some(k) = t.checked_sub(i + 1) {
                    pred += phi * (extended[k] - self.intercept);
                }
            }

            // Future shocks have zero expectation
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if let Some(k) = t.checked_sub(j + 1) {
                    pred += theta * residuals[k];
                }
            }

            extended.push(pred);
            residuals.push(0.0);
        }

        let on_differenced = &extended[self.differenced.len()..];
        let values = integrate(on_differenced, &self.historical_data, self.order.d);

        Forecast::new(values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn ar1_series(n: usize, c: f64, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let mut values = vec![c];
        for _ in 1..n {
            let prev = *values.last().unwrap();
            values.push(c + phi * (prev - c) + noise.sample(&mut rng));
        }
        values
    }

    #[test]
    fn test_recovers_ar1_coefficient() {
        let data = ar1_series(600, 0.2, 0.6, 7);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0)).train(&data).unwrap();

        assert_eq!(trained.ar_coefficients().len(), 1);
        assert!((trained.ar_coefficients()[0] - 0.6).abs() < 0.1);
        assert!((trained.intercept() - 0.2).abs() < 0.5);
        assert!(trained.aic().is_some());
        assert!(trained.bic().is_some());
    }

    #[test]
    fn test_one_step_forecast_follows_recursion() {
        let data = ar1_series(300, 0.0, 0.5, 11);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0)).train(&data).unwrap();

        let forecast = trained.forecast(1).unwrap();
        let c = trained.intercept();
        let phi = trained.ar_coefficients()[0];
        let expected = c + phi * (data.last().unwrap() - c);

        assert_eq!(forecast.horizon(), 1);
        assert_relative_eq!(forecast.next(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_only_model_forecasts_sample_mean() {
        let data = vec![1.0, 3.0, 2.0, 4.0, 5.0];
        let trained = ArimaModel::new(ArimaOrder::new(0, 0, 0)).train(&data).unwrap();

        assert_relative_eq!(trained.forecast(1).unwrap().next(), 3.0);
        assert_eq!(trained.iterations(), 0);
    }

    #[test]
    fn test_random_walk_forecasts_last_value() {
        let data = vec![1.0, 2.5, 2.0, 4.0];
        let trained = ArimaModel::new(ArimaOrder::new(0, 1, 0)).train(&data).unwrap();

        assert_relative_eq!(trained.forecast(1).unwrap().next(), 4.0);
    }

    #[test]
    fn test_arma_fit_is_stationary_and_invertible() {
        let data = ar1_series(400, 0.0, 0.3, 3);
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 1)).train(&data).unwrap();

        assert!(trained.ar_coefficients()[0].abs() < 1.0);
        assert!(trained.ma_coefficients()[0].abs() < 1.0);
        assert!(trained.forecast(3).unwrap().values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_differenced_trend_continues() {
        let data: Vec<f64> = (0..60).map(|i| 10.0 + 2.0 * i as f64 + (i as f64).sin() * 0.1).collect();
        let trained = ArimaModel::new(ArimaOrder::new(1, 1, 0)).train(&data).unwrap();

        let next = trained.forecast(1).unwrap().next();
        assert!(next > data.last().unwrap() - 5.0);
    }

    #[test]
    fn test_insufficient_data() {
        let model = ArimaModel::new(ArimaOrder::new(3, 2, 3));
        assert!(matches!(
            model.train(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_data() {
        let model = ArimaModel::default();
        assert!(model.train(&[1.0, f64::NAN, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn test_iteration_cap_is_a_convergence_failure() {
        let data = ar1_series(200, 0.0, 0.4, 5);
        let model = ArimaModel::new(ArimaOrder::new(2, 0, 2)).with_optimizer(NelderMeadConfig {
            max_iterations: 2,
            ..Default::default()
        });

        assert!(matches!(model.train(&data), Err(ForecastError::Convergence(_))));
    }

    #[test]
    fn test_constant_series_fits_the_level() {
        let data = vec![0.995; 39];
        let trained = ArimaModel::new(ArimaOrder::new(1, 0, 1)).train(&data).unwrap();

        assert_eq!(trained.iterations(), 0);
        assert_eq!(trained.ar_coefficients(), &[0.0]);
        assert_eq!(trained.ma_coefficients(), &[0.0]);
        assert_relative_eq!(trained.forecast(1).unwrap().next(), 0.995);
        assert!(trained.log_likelihood().is_none());
    }

    #[test]
    fn test_oversized_orders_are_rejected() {
        let data = ar1_series(50, 0.0, 0.4, 9);
        for order in [
            ArimaOrder::new(usize::MAX, 0, 0),
            ArimaOrder::new(0, usize::MAX, 0),
            ArimaOrder::new(1, 0, 1 << 63),
            ArimaOrder::new(51, 0, 0),
        ] {
            assert!(matches!(
                ArimaModel::new(order).train(&data),
                Err(ForecastError::InvalidOrder(_))
            ));
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(ArimaModel::new(ArimaOrder::new(1, 1, 1)).name(), "ARIMA(1,1,1)");
    }
}
