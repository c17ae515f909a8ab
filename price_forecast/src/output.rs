//! Result assembly and the JSON shapes emitted at the process boundary

use crate::annualize::Annualized;
use crate::error::Result;
use crate::orders::{ArimaOrder, GarchOrder};
use serde::{Deserialize, Serialize};

/// Successful forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastResult {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// Requested configuration, e.g. `ARIMA(1,0,0) + GARCH(1,1)`
    pub used_model: String,
}

/// Failed forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorResult {
    pub error: String,
}

/// Exactly one of the two shapes is ever emitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastOutput {
    Success(ForecastResult),
    Failure(ErrorResult),
}

/// Label naming the requested orders, independent of any fallback taken
pub fn model_label(arima: &ArimaOrder, garch: &GarchOrder) -> String {
    format!("{} + {}", arima, garch)
}

/// Package the annualized pair with its label
pub fn assemble(annualized: Annualized, used_model: String) -> ForecastResult {
    ForecastResult {
        annualized_return: annualized.annualized_return,
        annualized_volatility: annualized.annualized_volatility,
        used_model,
    }
}

impl ForecastOutput {
    pub fn failure(message: impl Into<String>) -> Self {
        ForecastOutput::Failure(ErrorResult {
            error: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ForecastOutput::Success(_))
    }

    /// Serialize as a single-line JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            // Only reachable for non-serializable values; keep the boundary well-formed
            serde_json::json!({ "error": err.to_string() }).to_string()
        })
    }
}

impl From<Result<ForecastResult>> for ForecastOutput {
    fn from(result: Result<ForecastResult>) -> Self {
        match result {
            Ok(forecast) => ForecastOutput::Success(forecast),
            Err(err) => ForecastOutput::failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_label_format() {
        assert_eq!(
            model_label(&ArimaOrder::new(1, 0, 0), &GarchOrder::new(1, 1)),
            "ARIMA(1,0,0) + GARCH(1,1)"
        );
    }

    #[test]
    fn test_success_shape() {
        let output: ForecastOutput = Ok(ForecastResult {
            annualized_return: 0.5,
            annualized_volatility: 0.25,
            used_model: "ARIMA(0,0,0) + GARCH(1,1)".to_string(),
        })
        .into();

        let value: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(
            value,
            json!({
                "annualized_return": 0.5,
                "annualized_volatility": 0.25,
                "used_model": "ARIMA(0,0,0) + GARCH(1,1)"
            })
        );
    }

    #[test]
    fn test_insufficient_data_shape() {
        let output: ForecastOutput =
            Err(ForecastError::InsufficientData { needed: 30, got: 20 }).into();

        assert!(!output.is_success());
        assert_eq!(output.to_json(), r#"{"error":"Not enough data"}"#);
    }

    #[test]
    fn test_shapes_round_trip_to_their_variant() {
        let failure: ForecastOutput = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(failure, ForecastOutput::failure("boom"));

        let mixed = r#"{"error":"boom","used_model":"x"}"#;
        assert!(serde_json::from_str::<ForecastOutput>(mixed).is_err());
    }
}
