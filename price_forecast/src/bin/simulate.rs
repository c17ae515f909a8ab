use anyhow::Context;
use clap::{Parser, Subcommand};
use price_forecast::data::PriceTable;
use price_forecast::diagnostics::init_logger;
use price_forecast::portfolios::PortfolioStore;
use price_forecast::simulation::{simulate_portfolio, SimulationRequest};
use price_forecast::{ForecastConfig, ForecastPipeline};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "simulate", version)]
#[command(about = "Monte Carlo projection of a stock portfolio")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tickers available in the CSV
    Stocks {
        /// Stock CSV with columns date,open,high,low,close,volume,Name
        #[arg(long)]
        csv: PathBuf,
    },
    /// Project a portfolio described by a JSON request
    Run {
        /// Stock CSV with columns date,open,high,low,close,volume,Name
        #[arg(long)]
        csv: PathBuf,

        /// Request JSON (stocks, weights, initialInvestment, forecastYears, ...)
        params: String,
    },
    /// Manage saved portfolio settings
    Portfolios {
        /// JSON file holding the saved portfolios
        #[arg(long, default_value = "portfolios.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: PortfolioAction,
    },
}

#[derive(Subcommand, Debug)]
enum PortfolioAction {
    /// Print every saved portfolio
    List,
    /// Save settings given as a JSON object and print the new id
    Save { settings: String },
    /// Delete the portfolio with this id
    Delete { id: String },
}

fn load_table(path: &Path) -> anyhow::Result<PriceTable> {
    PriceTable::from_csv(path)
        .with_context(|| format!("failed to load stock data from '{}'", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = match &args.config {
        Some(path) => ForecastConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => ForecastConfig::default(),
    };

    let output: Value = match &args.command {
        Command::Stocks { csv } => serde_json::to_value(load_table(csv)?.tickers())?,
        Command::Run { csv, params } => {
            let request: SimulationRequest =
                serde_json::from_str(params).context("invalid simulation request")?;
            let table = load_table(csv)?;
            let report = simulate_portfolio(&table, &request, &ForecastPipeline::new(config))?;
            serde_json::to_value(report)?
        }
        Command::Portfolios { store, action } => {
            let store = PortfolioStore::new(store);
            match action {
                PortfolioAction::List => serde_json::to_value(store.list()?)?,
                PortfolioAction::Save { settings } => {
                    let settings: Value =
                        serde_json::from_str(settings).context("invalid portfolio settings")?;
                    json!({ "success": true, "id": store.save(settings)? })
                }
                PortfolioAction::Delete { id } => {
                    json!({ "success": store.delete(id)? })
                }
            }
        }
    };

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{output}");
    }
    Ok(())
}
