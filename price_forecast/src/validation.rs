//! Input checks run before any transformation or fitting

use crate::error::{ForecastError, Result};

/// Accept the series only if it is present and has at least `min_observations` prices.
pub fn validate_prices(prices: Option<&[f64]>, min_observations: usize) -> Result<&[f64]> {
    match prices {
        Some(prices) if prices.len() >= min_observations => Ok(prices),
        other => Err(ForecastError::InsufficientData {
            needed: min_observations,
            got: other.map_or(0, <[f64]>::len),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 0)]
    #[case(Some(vec![]), 0)]
    #[case(Some(vec![1.0; 29]), 29)]
    fn test_rejects_short_or_absent(#[case] prices: Option<Vec<f64>>, #[case] got: usize) {
        let err = validate_prices(prices.as_deref(), 30).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { needed: 30, got: g } if g == got));
        assert_eq!(err.to_string(), "Not enough data");
    }

    #[test]
    fn test_accepts_at_threshold() {
        let prices = vec![1.0; 30];
        assert_eq!(validate_prices(Some(&prices), 30).unwrap().len(), 30);
    }
}
