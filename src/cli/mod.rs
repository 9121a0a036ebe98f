//! Command-line parsing for the sales forecaster.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! forecasting code. Defaults here mirror `ForecastConfig::default()`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Aggregation;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Per-product monthly sales forecasting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model per product, print accuracy and forecasts, and write charts.
    Run(RunArgs),
    /// Write a synthetic sales dataset to CSV.
    Generate(GenerateArgs),
}

/// Options for a forecasting run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Sales CSV (columns: Product_Name, Year, Month or Date, Monthly_Sales).
    #[arg(short = 'd', long, env = "SALES_DATA", default_value = "cleaned_sales_data.csv")]
    pub data: PathBuf,

    /// Product to forecast (repeatable). Defaults to Laptop Pro, Smartphone X and Wireless Headphones.
    #[arg(short = 'p', long = "product")]
    pub products: Vec<String>,

    /// First year of the historical window.
    #[arg(long, default_value_t = 2020)]
    pub year_start: i32,

    /// Last year of the historical window.
    #[arg(long, default_value_t = 2023)]
    pub year_end: i32,

    /// First month of the historical window.
    #[arg(long, default_value_t = 1)]
    pub month_start: u32,

    /// Last month of the historical window.
    #[arg(long, default_value_t = 12)]
    pub month_end: u32,

    /// How records are averaged into monthly points.
    #[arg(long, value_enum, default_value_t = Aggregation::Yearly)]
    pub aggregation: Aggregation,

    /// Year mapped to 0 by the normalized-year feature.
    #[arg(long, default_value_t = 2020)]
    pub base_year: i32,

    /// Divisor of the normalized-year feature.
    #[arg(long, default_value_t = 3.0)]
    pub year_span: f64,

    /// Months to forecast after the last observed month.
    #[arg(short = 'm', long, alias = "months-ahead", default_value_t = 12)]
    pub horizon: usize,

    /// Directory for chart files.
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip chart rendering.
    #[arg(long)]
    pub no_chart: bool,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Process products one after another instead of in parallel.
    #[arg(long)]
    pub sequential: bool,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "cleaned_sales_data.csv")]
    pub output: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Records per product and month.
    #[arg(long, default_value_t = 5)]
    pub records_per_month: usize,

    /// First year to generate.
    #[arg(long, default_value_t = 2020)]
    pub year_start: i32,

    /// Last year to generate.
    #[arg(long, default_value_t = 2023)]
    pub year_end: i32,

    /// Log-scale noise standard deviation.
    #[arg(long, default_value_t = 0.1)]
    pub noise: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_args_parse_repeated_products() {
        let cli = Cli::try_parse_from([
            "forecast",
            "run",
            "-p",
            "Laptop Pro",
            "-p",
            "Smartphone X",
            "--horizon",
            "3",
            "--aggregation",
            "monthly",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.products, vec!["Laptop Pro", "Smartphone X"]);
        assert_eq!(args.horizon, 3);
        assert_eq!(args.aggregation, Aggregation::Monthly);
    }
}
