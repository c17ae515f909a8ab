//! Historical performance metrics for a weighted portfolio

use crate::data::PriceTable;
use crate::error::{ForecastError, Result};
use forecast_math::statistics::{floor_percentile, mean, population_variance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annualized summary of a daily portfolio return series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMetrics {
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough loss of the compounded equity curve, as a fraction
    pub max_drawdown: f64,
    /// 5% empirical value at risk, scaled by `sqrt(periods_per_year)`
    #[serde(rename = "var95")]
    pub var_95: f64,
}

/// Weighted simple returns of the portfolio between consecutive dates.
///
/// A day is skipped when any weighted ticker is missing or has a zero close on
/// it or on the previous date.
pub fn portfolio_returns(table: &PriceTable, weights: &BTreeMap<String, f64>) -> Vec<f64> {
    let rows: Vec<_> = table.rows().map(|(_, row)| row).collect();

    rows.windows(2)
        .filter_map(|pair| {
            let (prev_row, curr_row) = (pair[0], pair[1]);
            weights.iter().try_fold(0.0, |acc, (ticker, weight)| {
                let prev = prev_row.get(ticker).copied().filter(|p| *p != 0.0)?;
                let curr = curr_row.get(ticker).copied().filter(|c| *c != 0.0)?;
                Some(acc + weight * (curr - prev) / prev)
            })
        })
        .collect()
}

/// Annualize a return series and measure its risk.
///
/// Drawdown is tracked on an equity curve starting at 1.0; the fraction is
/// independent of the starting amount.
pub fn historical_metrics(returns: &[f64], periods_per_year: u32) -> Result<HistoricalMetrics> {
    if returns.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    let periods = f64::from(periods_per_year);

    let annual_return = mean(returns)? * periods;
    let annual_volatility = population_variance(returns)?.sqrt() * periods.sqrt();
    let sharpe_ratio = if annual_volatility == 0.0 {
        0.0
    } else {
        annual_return / annual_volatility
    };

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let var_95 = floor_percentile(&sorted, 0.05) * periods.sqrt();

    Ok(HistoricalMetrics {
        annual_return,
        annual_volatility,
        sharpe_ratio,
        max_drawdown: max_drawdown(returns),
        var_95,
    })
}

/// Largest fractional decline from a running peak of the compounded curve
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut value = 1.0_f64;
    let mut peak = value;
    let mut worst = 0.0_f64;
    for r in returns {
        value *= 1.0 + r;
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}
