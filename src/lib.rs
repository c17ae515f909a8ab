//! # Price Forecast Workspace
//!
//! Umbrella crate over the workspace members:
//!
//! - [`forecast_math`]: return transforms, statistics, differencing and the
//!   bounded Nelder-Mead minimizer
//! - [`price_forecast`]: ARIMA/GARCH forecasting pipeline, portfolio metrics
//!   and Monte Carlo projection
//!
//! ## Example
//!
//! ```
//! use price_forecast_workspace::forecast_json;
//!
//! let output = forecast_json("[1, 2, 3]", r#"{"p":1,"d":0,"q":0}"#, r#"{"p":1,"q":1}"#);
//! assert_eq!(output, r#"{"error":"Not enough data"}"#);
//! ```

pub use forecast_math;
pub use price_forecast;

use price_forecast::ForecastPipeline;

/// Run the default pipeline on three JSON arguments and return one JSON line.
///
/// Never fails: every problem is reported as `{"error": "..."}`.
///
/// # Examples
///
/// ```
/// use price_forecast_workspace::forecast_json;
///
/// let prices: Vec<f64> = (0..40).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
/// let prices = serde_json::to_string(&prices).unwrap();
///
/// let output = forecast_json(&prices, r#"{"p":0,"d":0,"q":0}"#, r#"{"p":1,"q":1}"#);
/// assert!(output.contains(r#""used_model":"ARIMA(0,0,0) + GARCH(1,1)""#));
/// ```
pub fn forecast_json(prices: &str, arima: &str, garch: &str) -> String {
    ForecastPipeline::default()
        .run_json_args(prices, arima, garch)
        .to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_is_reported() {
        let output = forecast_json("{", "{}", "{}");
        assert!(output.starts_with(r#"{"error":"#));
    }

    #[test]
    fn test_members_are_reachable() {
        let returns = forecast_math::returns::log_returns(&[1.0, 2.0], 100.0).unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(price_forecast::NAME, "price_forecast");
    }
}
