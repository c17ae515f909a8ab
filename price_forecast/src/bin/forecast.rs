use clap::error::ErrorKind;
use clap::Parser;
use price_forecast::diagnostics::init_logger;
use price_forecast::{ForecastConfig, ForecastOutput, ForecastPipeline};
use std::path::PathBuf;

/// Forecast annualized return and volatility of a price series.
///
/// Prints exactly one JSON object to stdout: either the forecast or
/// `{"error": "..."}`. Diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "forecast", version)]
struct Args {
    /// Prices as a JSON array, oldest first
    prices: String,

    /// ARIMA order as JSON, e.g. '{"p":1,"d":0,"q":1}'
    arima: String,

    /// GARCH order as JSON, e.g. '{"p":1,"q":1}'
    garch: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", ForecastOutput::failure(err.to_string().trim()).to_json());
            return;
        }
    };

    init_logger(args.verbose);

    let config = match &args.config {
        Some(path) => match ForecastConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to load configuration");
                println!("{}", ForecastOutput::failure(err.to_string()).to_json());
                return;
            }
        },
        None => ForecastConfig::default(),
    };

    let output = ForecastPipeline::new(config).run_json_args(&args.prices, &args.arima, &args.garch);
    if let ForecastOutput::Failure(failure) = &output {
        tracing::warn!(error = %failure.error, "forecast failed");
    }
    println!("{}", output.to_json());
}
