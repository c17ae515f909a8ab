//! Scaling one-period forecasts to an annual horizon

use serde::{Deserialize, Serialize};

/// Annualized mean return and volatility, as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annualized {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
}

/// Undo the return scaling and scale to `periods_per_year`.
///
/// The mean grows linearly with the horizon, the volatility with its square root.
pub fn annualize(
    forecast_mean: f64,
    forecast_vol: f64,
    return_scale: f64,
    periods_per_year: u32,
) -> Annualized {
    let periods = f64::from(periods_per_year);
    Annualized {
        annualized_return: (forecast_mean / return_scale) * periods,
        annualized_volatility: (forecast_vol / return_scale) * periods.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trading_year() {
        let a = annualize(0.1, 1.0, 100.0, 252);
        assert_eq!(a.annualized_return, (0.1 / 100.0) * 252.0);
        assert_eq!(a.annualized_volatility, (1.0 / 100.0) * 252.0_f64.sqrt());
    }

    proptest! {
        #[test]
        fn scaling_is_exact(m in -50.0f64..50.0, v in 0.0f64..50.0) {
            let a = annualize(m, v, 100.0, 252);
            prop_assert_eq!(a.annualized_return, (m / 100.0) * 252.0);
            prop_assert_eq!(a.annualized_volatility, (v / 100.0) * 252.0_f64.sqrt());
        }
    }
}
