//! Price-to-return transforms

use crate::{MathError, Result};

fn check_prices(prices: &[f64]) -> Result<()> {
    if let Some((i, p)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(MathError::InvalidInput(format!(
            "Price at index {} must be a positive finite number, got {}",
            i, p
        )));
    }
    Ok(())
}

/// Scaled log returns: `scale * ln(p[t] / p[t-1])` for `t = 1..n`.
///
/// The first observation has no predecessor and is dropped, so the output
/// has one element fewer than the input. A series with fewer than two prices
/// yields an empty vector.
pub fn log_returns(prices: &[f64], scale: f64) -> Result<Vec<f64>> {
    check_prices(prices)?;

    Ok(prices
        .windows(2)
        .map(|w| scale * (w[1] / w[0]).ln())
        .collect())
}
