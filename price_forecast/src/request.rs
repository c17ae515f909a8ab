//! Decoding the three serialized inputs of a forecast invocation

use crate::error::Result;
use crate::orders::{ArimaOrder, GarchOrder};
use serde::{Deserialize, Serialize};

/// A decoded forecast invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Chronological prices; `None` when the caller sent `null`
    pub prices: Option<Vec<f64>>,
    pub arima: ArimaOrder,
    pub garch: GarchOrder,
}

impl ForecastRequest {
    /// Decode the price series, ARIMA order and GARCH order from their JSON texts
    pub fn from_json_args(prices: &str, arima: &str, garch: &str) -> Result<Self> {
        Ok(Self {
            prices: serde_json::from_str(prices)?,
            arima: serde_json::from_str(arima)?,
            garch: serde_json::from_str(garch)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    #[test]
    fn test_decodes_arguments() {
        let request =
            ForecastRequest::from_json_args("[1, 2.5, 3]", r#"{"p":1,"d":0,"q":1}"#, r#"{"p":1,"q":1}"#)
                .unwrap();

        assert_eq!(request.prices, Some(vec![1.0, 2.5, 3.0]));
        assert_eq!(request.arima, ArimaOrder::new(1, 0, 1));
        assert_eq!(request.garch, GarchOrder::new(1, 1));
    }

    #[test]
    fn test_null_prices_are_absent() {
        let request =
            ForecastRequest::from_json_args("null", r#"{"p":0,"d":0,"q":0}"#, r#"{"p":1,"q":0}"#)
                .unwrap();
        assert_eq!(request.prices, None);
    }

    #[test]
    fn test_malformed_input_is_a_json_error() {
        let result = ForecastRequest::from_json_args("[1, \"a\"]", r#"{"p":1,"d":0,"q":1}"#, r#"{"p":1,"q":1}"#);
        assert!(matches!(result, Err(ForecastError::JsonError(_))));

        let result = ForecastRequest::from_json_args("[1]", r#"{"p":1}"#, r#"{"p":1,"q":1}"#);
        assert!(matches!(result, Err(ForecastError::JsonError(_))));
    }
}
