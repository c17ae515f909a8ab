//! GARCH models for the conditional variance of a zero-mean return series
//!
//! `σ²_t = ω + Σ_{i=1..p} α_i ε²_{t-i} + Σ_{j=1..q} β_j σ²_{t-j}`
//!
//! Lags before the start of the sample take an exponentially weighted
//! backcast of the early squared residuals.

use crate::error::{ForecastError, Result};
use crate::models::{Forecast, ForecastModel, TrainedForecastModel};
use crate::orders::GarchOrder;
use forecast_math::{nelder_mead, statistics, NelderMeadConfig};
use std::f64::consts::PI;
use tracing::debug;

const BACKCAST_DECAY: f64 = 0.94;
const BACKCAST_WINDOW: usize = 75;

/// GARCH model implementation
#[derive(Debug, Clone)]
pub struct GarchModel {
    /// Model name
    name: String,
    /// Requested order
    order: GarchOrder,
    /// Stopping rules for estimation
    optimizer: NelderMeadConfig,
}

/// Trained GARCH model
#[derive(Debug, Clone)]
pub struct TrainedGarchModel {
    name: String,
    order: GarchOrder,
    /// Variance intercept
    omega: f64,
    /// ARCH parameters
    alpha: Vec<f64>,
    /// GARCH parameters
    beta: Vec<f64>,
    /// Residuals (the returns, under a zero mean)
    residuals: Vec<f64>,
    /// In-sample conditional variances
    conditional_variance: Vec<f64>,
    /// Pre-sample value for ε² and σ² lags
    backcast: f64,
    log_likelihood: f64,
    iterations: usize,
}

fn backcast(residuals: &[f64]) -> f64 {
    let tau = residuals.len().min(BACKCAST_WINDOW);
    let mut weight = 1.0;
    let mut total_weight = 0.0;
    let mut total = 0.0;
    for e in &residuals[..tau] {
        total += weight * e * e;
        total_weight += weight;
        weight *= BACKCAST_DECAY;
    }
    total / total_weight
}

/// Filter the variance recursion over `squared` residuals, returning σ²_t per observation
fn conditional_variances(
    squared: &[f64],
    omega: f64,
    alpha: &[f64],
    beta: &[f64],
    backcast: f64,
) -> Vec<f64> {
    let mut sigma2: Vec<f64> = Vec::with_capacity(squared.len());

    for t in 0..squared.len() {
        let mut value = omega;
        for (i, a) in alpha.iter().enumerate() {
            value += a * t.checked_sub(i + 1).map_or(backcast, |k| squared[k]);
        }
        for (j, b) in beta.iter().enumerate() {
            value += b * t.checked_sub(j + 1).map_or(backcast, |k| sigma2[k]);
        }
        sigma2.push(value);
    }

    sigma2
}

fn negative_log_likelihood(squared: &[f64], sigma2: &[f64]) -> f64 {
    let ln_2pi = (2.0 * PI).ln();
    let mut total = 0.0;
    for (e2, s2) in squared.iter().zip(sigma2) {
        if !(s2.is_finite() && *s2 > 0.0) {
            return f64::INFINITY;
        }
        total += ln_2pi + s2.ln() + e2 / s2;
    }
    0.5 * total
}

impl GarchModel {
    /// Create a new GARCH model
    pub fn new(order: GarchOrder) -> Self {
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
    pub fn order(&self) -> GarchOrder {
        self.order
    }

    fn unpack(&self, params: &[f64]) -> (f64, Vec<f64>, Vec<f64>) {
        let GarchOrder { p, q } = self.order;
        (
            params[0],
            params[1..1 + p].to_vec(),
            params[1 + p..1 + p + q].to_vec(),
        )
    }
}

impl Default for GarchModel {
    fn default() -> Self {
        Self::new(GarchOrder::new(1, 1))
    }
}

impl ForecastModel for GarchModel {
    type Trained = TrainedGarchModel;

    fn train(&self, data: &[f64]) -> Result<TrainedGarchModel> {
        let GarchOrder { p, q } = self.order;

        if p == 0 {
            return Err(ForecastError::InvalidOrder(format!(
                "{} needs at least one ARCH lag",
                self.name
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Series contains non-finite values".to_string(),
            ));
        }

        if p.max(q) > data.len() {
            return Err(ForecastError::InvalidOrder(format!(
                "{} is too large for {} observations",
                self.name,
                data.len()
            )));
        }

        let n_params = 1 + p + q;
        let needed = n_params + p.max(q) + 1;
        if data.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: data.len(),
            });
        }

        let variance = statistics::mean_square(data)?;
        if variance <= 0.0 {
            return Err(ForecastError::DataError(
                "Series has zero variance".to_string(),
            ));
        }

        let squared: Vec<f64> = data.iter().map(|e| e * e).collect();
        let backcast = backcast(data);

        let alpha_start = 0.1 / p as f64;
        let beta_start = if q > 0 { 0.8 / q as f64 } else { 0.0 };
        let persistence_start = alpha_start * p as f64 + beta_start * q as f64;

        let mut initial = Vec::with_capacity(n_params);
        initial.push(variance * (1.0 - persistence_start));
        initial.extend(std::iter::repeat(alpha_start).take(p));
        initial.extend(std::iter::repeat(beta_start).take(q));

        let mut bounds = vec![(variance * 1e-8, variance * 10.0)];
        bounds.extend(std::iter::repeat((0.0, 1.0)).take(p + q));

        let objective = |params: &[f64]| {
            let (omega, alpha, beta) = self.unpack(params);
            // Covariance stationarity
            if alpha.iter().sum::<f64>() + beta.iter().sum::<f64>() >= 1.0 {
                return f64::INFINITY;
            }
            let sigma2 = conditional_variances(&squared, omega, &alpha, &beta, backcast);
            negative_log_likelihood(&squared, &sigma2)
        };

        let minimum = nelder_mead(objective, &initial, Some(&bounds), &self.optimizer)?;
        debug!(
            model = %self.name,
            iterations = minimum.iterations,
            log_likelihood = -minimum.value,
            converged = minimum.converged,
            "variance likelihood maximized"
        );

        if !minimum.converged {
            return Err(ForecastError::Convergence(format!(
                "{} stopped after {} iterations",
                self.name, minimum.iterations
            )));
        }

        let (omega, alpha, beta) = self.unpack(&minimum.point);
        let conditional_variance = conditional_variances(&squared, omega, &alpha, &beta, backcast);

        Ok(TrainedGarchModel {
            name: self.name.clone(),
            order: self.order,
            omega,
            alpha,
            beta,
            residuals: data.to_vec(),
            conditional_variance,
            backcast,
            log_likelihood: -minimum.value,
            iterations: minimum.iterations,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGarchModel {
    pub fn order(&self) -> GarchOrder {
        self.order
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Sum of ARCH and GARCH parameters
    pub fn persistence(&self) -> f64 {
        self.alpha.iter().sum::<f64>() + self.beta.iter().sum::<f64>()
    }

    /// Long-run variance `ω / (1 - persistence)`, if the fit is stationary
    pub fn unconditional_variance(&self) -> Option<f64> {
        let persistence = self.persistence();
        (persistence < 1.0).then(|| self.omega / (1.0 - persistence))
    }

    pub fn conditional_variance(&self) -> &[f64] {
        &self.conditional_variance
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl TrainedForecastModel for TrainedGarchModel {
    /// Conditional variance forecasts for the next `horizons` periods
    fn forecast(&self, horizons: usize) -> Result<Forecast> {
        if self.residuals.is_empty() || self.conditional_variance.is_empty() {
            return Err(ForecastError::ForecastingError(
                "Model has not been fitted to data".to_string(),
            ));
        }

        let mut squared: Vec<f64> = self.residuals.iter().map(|e| e * e).collect();
        let mut sigma2 = self.conditional_variance.clone();
        let start = sigma2.len();

        for _ in 0..horizons {
            let t = sigma2.len();
            let mut value = self.omega;
            for (i, a) in self.alpha.iter().enumerate() {
                value += a * t.checked_sub(i + 1).map_or(self.backcast, |k| squared[k]);
            }
            for (j, b) in self.beta.iter().enumerate() {
                value += b * t.checked_sub(j + 1).map_or(self.backcast, |k| sigma2[k]);
            }
            sigma2.push(value);
            // E[ε²] of a future period is its conditional variance
            squared.push(value);
        }

        Forecast::new(sigma2[start..].to_vec())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
