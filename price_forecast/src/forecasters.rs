//! Mean and volatility forecasters with closed-form fallbacks.
//!
//! Each forecaster tries its model first. When training or forecasting fails,
//! or yields a non-finite number, it falls back to a simple statistic of the
//! return series: the sample mean for the mean, the sample standard deviation
//! for the volatility. Which path was taken is kept in [`Estimate`].

use crate::diagnostics;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use forecast_math::statistics;
use tracing::warn;

/// A one-period forecast and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// The model fitted and forecast successfully
    Fitted(f64),
    /// The model failed; `value` is the fallback statistic
    Degraded { value: f64, reason: String },
}

impl Estimate {
    /// The forecast value, whichever path produced it
    pub fn value(&self) -> f64 {
        match self {
            Estimate::Fitted(value) => *value,
            Estimate::Degraded { value, .. } => *value,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, Estimate::Fitted(_))
    }

    /// Why the model was abandoned, for degraded estimates
    pub fn reason(&self) -> Option<&str> {
        match self {
            Estimate::Fitted(_) => None,
            Estimate::Degraded { reason, .. } => Some(reason),
        }
    }
}

fn one_step<M: ForecastModel>(model: &M, returns: &[f64], suppress: bool) -> Result<f64> {
    let value = diagnostics::scoped(suppress, || -> Result<f64> {
        Ok(model.train(returns)?.forecast(1)?.next())
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForecastError::ForecastingError(format!(
            "{} produced a non-finite forecast",
            model.name()
        )))
    }
}

/// One-step-ahead mean return, in the units of `returns`.
///
/// Model failures never propagate; the only error is a series too short for
/// the sample mean itself.
pub fn forecast_mean<M: ForecastModel>(
    model: &M,
    returns: &[f64],
    suppress: bool,
) -> Result<Estimate> {
    match one_step(model, returns, suppress) {
        Ok(value) => Ok(Estimate::Fitted(value)),
        Err(err) => {
            let value = statistics::mean(returns)?;
            warn!(
                model = model.name(),
                error = %err,
                fallback = value,
                "mean model failed, using sample mean"
            );
            Ok(Estimate::Degraded {
                value,
                reason: err.to_string(),
            })
        }
    }
}

/// One-step-ahead volatility (square root of the forecast variance), in the
/// units of `returns`.
///
/// Falls back to the sample standard deviation, which ignores any volatility
/// clustering in the series.
pub fn forecast_volatility<M: ForecastModel>(
    model: &M,
    returns: &[f64],
    suppress: bool,
) -> Result<Estimate> {
    let fitted = one_step(model, returns, suppress).and_then(|variance| {
        if variance >= 0.0 {
            Ok(variance.sqrt())
        } else {
            Err(ForecastError::ForecastingError(format!(
                "{} produced a negative variance",
                model.name()
            )))
        }
    });

    match fitted {
        Ok(value) => Ok(Estimate::Fitted(value)),
        Err(err) => {
            let value = statistics::sample_std_dev(returns)?;
            warn!(
                model = model.name(),
                error = %err,
                fallback = value,
                "volatility model failed, using sample standard deviation"
            );
            Ok(Estimate::Degraded {
                value,
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Forecast;
    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct Fixed(f64);

    impl TrainedForecastModel for Fixed {
        fn forecast(&self, horizons: usize) -> Result<Forecast> {
            Forecast::new(vec![self.0; horizons])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Debug)]
    struct Stub(Option<f64>);

    impl ForecastModel for Stub {
        type Trained = Fixed;

        fn train(&self, _data: &[f64]) -> Result<Fixed> {
            self.0
                .map(Fixed)
                .ok_or_else(|| ForecastError::Convergence("stub".to_string()))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    const RETURNS: [f64; 4] = [1.0, 2.0, 3.0, 6.0];

    #[test]
    fn test_fitted_values_pass_through() {
        let mean = forecast_mean(&Stub(Some(0.7)), &RETURNS, true).unwrap();
        assert_eq!(mean, Estimate::Fitted(0.7));

        let vol = forecast_volatility(&Stub(Some(4.0)), &RETURNS, true).unwrap();
        assert_eq!(vol, Estimate::Fitted(2.0));
    }

    #[test]
    fn test_failures_fall_back_to_statistics() {
        let mean = forecast_mean(&Stub(None), &RETURNS, true).unwrap();
        assert!(!mean.is_fitted());
        assert_relative_eq!(mean.value(), 3.0);
        assert!(mean.reason().unwrap().contains("stub"));

        let vol = forecast_volatility(&Stub(None), &RETURNS, false).unwrap();
        assert_relative_eq!(vol.value(), (14.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_and_negative_forecasts_degrade() {
        let mean = forecast_mean(&Stub(Some(f64::NAN)), &RETURNS, true).unwrap();
        assert!(!mean.is_fitted());

        let vol = forecast_volatility(&Stub(Some(-1.0)), &RETURNS, true).unwrap();
        assert!(!vol.is_fitted());
    }

    #[test]
    fn test_fallback_needs_enough_returns() {
        assert!(forecast_mean(&Stub(None), &[], true).is_err());
        assert!(forecast_volatility(&Stub(None), &[1.0], true).is_err());
    }
}
