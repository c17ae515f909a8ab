//! Monte Carlo projection of a portfolio's value over whole years.
//!
//! Annual returns are drawn as `drift + volatility * z` with standard normal
//! `z`. The drift/volatility pair comes either from the model forecast of the
//! portfolio's price index or, when no model orders are requested or the
//! forecast fails, from the portfolio's historical metrics.

use crate::data::PriceTable;
use crate::error::{ForecastError, Result};
use crate::metrics::{historical_metrics, portfolio_returns, HistoricalMetrics};
use crate::orders::{ArimaOrder, GarchOrder};
use crate::output::ForecastResult;
use crate::pipeline::ForecastPipeline;
use chrono::NaiveDate;
use forecast_math::statistics::floor_percentile;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

const MONTHS_PER_YEAR: f64 = 12.0;
/// A path succeeds when its final value at least reaches this multiple of the
/// initial investment
const SUCCESS_MULTIPLE: f64 = 2.0;

/// How money is added after the initial investment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ContributionPlan {
    #[default]
    LumpSum,
    /// Amount added each month, credited once per year
    Monthly(f64),
    /// Amount added once per year
    Yearly(f64),
}

impl ContributionPlan {
    /// Total contributed over one year
    pub fn annual_amount(&self) -> f64 {
        match self {
            ContributionPlan::LumpSum => 0.0,
            ContributionPlan::Monthly(amount) => amount * MONTHS_PER_YEAR,
            ContributionPlan::Yearly(amount) => *amount,
        }
    }
}

/// Inputs of one projection
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub initial_investment: f64,
    pub forecast_years: u32,
    pub simulations: usize,
    pub contribution: ContributionPlan,
    /// Annual inflation, in percent
    pub inflation_rate: f64,
    /// Annual fund expenses, in percent
    pub expense_ratio: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl SimulationParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_investment.is_finite() && self.initial_investment > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Initial investment must be positive".to_string(),
            ));
        }
        if self.simulations == 0 {
            return Err(ForecastError::InvalidParameter(
                "At least one simulation is required".to_string(),
            ));
        }
        let contribution = self.contribution.annual_amount();
        if !(contribution.is_finite() && contribution >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Contributions must be non-negative".to_string(),
            ));
        }
        if !self.inflation_rate.is_finite() || !self.expense_ratio.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Inflation and expense ratio must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cross-section of all paths at one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub year: u32,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
}

/// Distribution of final values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStats {
    pub median: f64,
    /// Share of paths whose final value at least doubled the initial investment
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    /// Year 0 through `forecast_years`
    pub avg_path: Vec<PathPoint>,
    pub simulation_stats: SimulationStats,
}

/// Project `params.simulations` independent paths.
///
/// `drift` and `volatility` are annual fractions.
pub fn run_simulation(
    drift: f64,
    volatility: f64,
    params: &SimulationParams,
) -> Result<SimulationOutcome> {
    params.validate()?;
    if !drift.is_finite() || !(volatility.is_finite() && volatility >= 0.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Invalid drift/volatility pair ({drift}, {volatility})"
        )));
    }

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let years = params.forecast_years as usize;
    let cost = (params.inflation_rate + params.expense_ratio) / 100.0;
    let contribution = params.contribution.annual_amount();

    // by_year[year][path]
    let mut by_year = vec![Vec::with_capacity(params.simulations); years + 1];
    for _ in 0..params.simulations {
        let mut value = params.initial_investment;
        by_year[0].push(value);
        for slot in by_year.iter_mut().skip(1) {
            let z: f64 = rng.sample(StandardNormal);
            let real_return = drift + volatility * z - cost;
            value *= 1.0 + real_return;
            value += contribution * (1.0 + real_return / 2.0);
            slot.push(value);
        }
    }

    let avg_path = by_year
        .iter_mut()
        .zip(0u32..)
        .map(|(values, year)| {
            values.sort_by(|a, b| a.total_cmp(b));
            PathPoint {
                year,
                median: floor_percentile(values, 0.5),
                p10: floor_percentile(values, 0.1),
                p90: floor_percentile(values, 0.9),
            }
        })
        .collect();

    let finals = &by_year[years];
    let target = params.initial_investment * SUCCESS_MULTIPLE;
    let successes = finals.iter().filter(|v| **v >= target).count();

    Ok(SimulationOutcome {
        avg_path,
        simulation_stats: SimulationStats {
            median: floor_percentile(finals, 0.5),
            success_rate: successes as f64 / params.simulations as f64,
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    #[default]
    Lumpsum,
    Monthly,
    Yearly,
}

/// Inclusive date window; ignored unless both ends are given
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// A portfolio projection request as sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub stocks: Vec<String>,
    pub weights: BTreeMap<String, f64>,
    pub initial_investment: f64,
    pub forecast_years: u32,
    pub simulations: usize,
    #[serde(default)]
    pub investment_type: InvestmentType,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub yearly_contribution: f64,
    #[serde(default)]
    pub inflation_rate: f64,
    #[serde(default)]
    pub expense_ratio: f64,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub arima_params: Option<ArimaOrder>,
    #[serde(default)]
    pub garch_params: Option<GarchOrder>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    pub fn params(&self) -> SimulationParams {
        let contribution = match self.investment_type {
            InvestmentType::Lumpsum => ContributionPlan::LumpSum,
            InvestmentType::Monthly => ContributionPlan::Monthly(self.monthly_contribution),
            InvestmentType::Yearly => ContributionPlan::Yearly(self.yearly_contribution),
        };
        SimulationParams {
            initial_investment: self.initial_investment,
            forecast_years: self.forecast_years,
            simulations: self.simulations,
            contribution,
            inflation_rate: self.inflation_rate,
            expense_ratio: self.expense_ratio,
            seed: self.seed,
        }
    }

    /// Weight of every requested stock
    fn stock_weights(&self) -> Result<BTreeMap<String, f64>> {
        if self.stocks.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "No stocks selected".to_string(),
            ));
        }
        self.stocks
            .iter()
            .map(|stock| match self.weights.get(stock) {
                Some(weight) if weight.is_finite() => Ok((stock.clone(), *weight)),
                _ => Err(ForecastError::InvalidParameter(format!(
                    "Missing weight for {stock}"
                ))),
            })
            .collect()
    }
}

/// Everything a portfolio projection reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub avg_path: Vec<PathPoint>,
    pub historical_metrics: HistoricalMetrics,
    pub simulation_stats: SimulationStats,
    /// Present when the model forecast drove the projection
    pub forecast: Option<ForecastResult>,
}

/// Price index of a return series, starting at 1.0
pub fn price_index(returns: &[f64]) -> Vec<f64> {
    std::iter::once(1.0)
        .chain(returns.iter().scan(1.0, |level, r| {
            *level *= 1.0 + r;
            Some(*level)
        }))
        .collect()
}

/// Project a weighted portfolio of the table's tickers
pub fn simulate_portfolio(
    table: &PriceTable,
    request: &SimulationRequest,
    pipeline: &ForecastPipeline,
) -> Result<SimulationReport> {
    let weights = request.stock_weights()?;
    let window = match request.date_range {
        Some(DateRange {
            start: Some(start),
            end: Some(end),
        }) => table.filter_dates(start, end),
        _ => table.clone(),
    };

    let returns = portfolio_returns(&window, &weights);
    let historical = historical_metrics(&returns, pipeline.config().periods_per_year)?;

    let forecast = match (request.arima_params, request.garch_params) {
        (Some(arima), Some(garch)) if returns.len() >= pipeline.config().min_observations => {
            let index = price_index(&returns);
            match pipeline.run(Some(&index), arima, garch) {
                Ok(result) => Some(result),
                Err(err) => {
                    warn!(error = %err, "forecast failed, using historical metrics");
                    None
                }
            }
        }
        _ => None,
    };

    let (drift, volatility) = match &forecast {
        Some(result) => (result.annualized_return, result.annualized_volatility),
        None => (historical.annual_return, historical.annual_volatility),
    };
    info!(
        drift,
        volatility,
        from_forecast = forecast.is_some(),
        "starting projection"
    );

    let outcome = run_simulation(drift, volatility, &request.params())?;
    Ok(SimulationReport {
        avg_path: outcome.avg_path,
        historical_metrics: historical,
        simulation_stats: outcome.simulation_stats,
        forecast,
    })
}
