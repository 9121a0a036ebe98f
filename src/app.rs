//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the forecasting pipeline or the dataset generator
//! - prints the run summary

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, GenerateArgs, RunArgs};
use crate::data::{SyntheticConfig, default_profiles, generate_records, write_sales_csv};
use crate::domain::{DEFAULT_PRODUCTS, ForecastConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `forecast` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();
    init_tracing();

    // `forecast` and `forecast --data x.csv` behave like `forecast run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Ignore the error if a subscriber is already installed (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);
    let run = pipeline::run_forecast(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = SyntheticConfig {
        profiles: default_profiles(),
        year_start: args.year_start,
        year_end: args.year_end,
        records_per_month: args.records_per_month,
        noise_sigma: args.noise,
        seed: args.seed,
    };
    let records = generate_records(&config)?;
    write_sales_csv(&args.output, &records)?;

    info!(
        path = %args.output.display(),
        rows = records.len(),
        products = config.profiles.len(),
        "synthetic dataset written"
    );
    Ok(())
}

pub fn forecast_config_from_args(args: &RunArgs) -> ForecastConfig {
    let products = if args.products.is_empty() {
        DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect()
    } else {
        args.products.clone()
    };

    ForecastConfig {
        data_path: args.data.clone(),
        products,
        year_start: args.year_start,
        year_end: args.year_end,
        month_start: args.month_start,
        month_end: args.month_end,
        aggregation: args.aggregation,
        base_year: args.base_year,
        year_span: args.year_span,
        horizon: args.horizon,
        output_dir: args.output_dir.clone(),
        render_charts: !args.no_chart,
        chart_width: args.width,
        chart_height: args.height,
        parallel: !args.sequential,
    }
}

/// Rewrite argv so `forecast` defaults to `forecast run`.
///
/// Rules:
/// - `forecast`                      -> `forecast run`
/// - `forecast --data x.csv ...`     -> `forecast run --data x.csv ...`
/// - `forecast --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "generate");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(args(&["forecast"])), args(&["forecast", "run"]));
        assert_eq!(
            rewrite_args(args(&["forecast", "-d", "x.csv"])),
            args(&["forecast", "run", "-d", "x.csv"])
        );
        assert_eq!(rewrite_args(args(&["forecast", "--help"])), args(&["forecast", "--help"]));
        assert_eq!(rewrite_args(args(&["forecast", "generate"])), args(&["forecast", "generate"]));
    }

    #[test]
    fn default_args_match_default_config() {
        let cli = crate::cli::Cli::parse_from(args(&["forecast", "run", "--data", "cleaned_sales_data.csv"]));
        let Command::Run(run_args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(forecast_config_from_args(&run_args), ForecastConfig::default());
    }
}
