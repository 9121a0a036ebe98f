//! The forecasting pipeline as an explicit function of (dataset, config).
//!
//! Per product, strictly in this order:
//! aggregate -> fit -> evaluate -> predict -> report
//!
//! Products are independent: each run owns its series, model and forecast, and
//! a failure in one product is recorded in its outcome without touching the
//! others. Only the shared input stage (no dataset at all) aborts the run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::domain::{EvaluationResult, ForecastConfig, ForecastResult, ProductSeries, SalesRecord};
use crate::error::ForecastError;
use crate::features::FeatureEngineer;
use crate::io::ingest::{IngestedData, load_sales_records};
use crate::model::FittedModel;
use crate::series::{SeriesWindow, build_product_series};

/// What happened to a product's chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Written(PathBuf),
    Disabled,
    /// The numbers are still valid; only the artifact is missing.
    Failed(ForecastError),
}

/// Everything one product's pipeline produced.
#[derive(Debug, Clone)]
pub struct ProductForecast {
    /// Chronologically sorted history.
    pub series: ProductSeries,
    pub model: FittedModel,
    pub evaluation: EvaluationResult,
    pub forecast: ForecastResult,
    pub chart: ChartOutcome,
}

#[derive(Debug, Clone)]
pub enum ProductOutcome {
    Completed(Box<ProductForecast>),
    Skipped { product: String, reason: ForecastError },
}

impl ProductOutcome {
    pub fn product(&self) -> &str {
        match self {
            ProductOutcome::Completed(f) => &f.series.product,
            ProductOutcome::Skipped { product, .. } => product,
        }
    }
}

/// All computed outputs of a single `forecast run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// One outcome per requested product, in request order.
    pub outcomes: Vec<ProductOutcome>,
    pub records_used: usize,
}

impl RunOutput {
    pub fn completed(&self) -> impl Iterator<Item = &ProductForecast> {
        self.outcomes.iter().filter_map(|o| match o {
            ProductOutcome::Completed(f) => Some(f.as_ref()),
            ProductOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &ForecastError)> {
        self.outcomes.iter().filter_map(|o| match o {
            ProductOutcome::Skipped { product, reason } => Some((product.as_str(), reason)),
            ProductOutcome::Completed(_) => None,
        })
    }

    /// Fitted models keyed by product name.
    pub fn models(&self) -> BTreeMap<&str, &FittedModel> {
        self.completed().map(|f| (f.model.product.as_str(), &f.model)).collect()
    }
}

/// Load the dataset named by `config.data_path` and run every product.
pub fn run_forecast(config: &ForecastConfig) -> Result<RunOutput, ForecastError> {
    config.validate()?;

    let IngestedData {
        records,
        row_errors,
        rows_read,
        has_month,
    } = load_sales_records(&config.data_path)?;

    info!(
        path = %config.data_path.display(),
        rows_read,
        rows_used = records.len(),
        rejected = row_errors.len(),
        "loaded sales data"
    );
    for e in row_errors.iter().take(5) {
        warn!(line = e.line, "skipped row: {}", e.message);
    }
    if !has_month {
        info!("dataset has no month column; only yearly aggregation is meaningful");
    }

    run_forecast_with_records(&records, config)
}

/// Run every configured product against an in-memory dataset.
pub fn run_forecast_with_records(records: &[SalesRecord], config: &ForecastConfig) -> Result<RunOutput, ForecastError> {
    config.validate()?;
    if records.is_empty() {
        return Err(ForecastError::MissingInputData("dataset contains no sales records".to_string()));
    }

    let engineer = FeatureEngineer::from_config(config)?;
    let window = SeriesWindow::from_config(config);

    let run_one = |product: &String| match run_product(records, product, &engineer, &window, config) {
        Ok(forecast) => ProductOutcome::Completed(Box::new(forecast)),
        Err(reason) => {
            match &reason {
                ForecastError::EmptyProductSeries { .. } => warn!(product = %product, "skipping: {reason}"),
                _ => error!(product = %product, "product failed: {reason}"),
            }
            ProductOutcome::Skipped {
                product: product.clone(),
                reason,
            }
        }
    };

    let outcomes: Vec<ProductOutcome> = if config.parallel {
        config.products.par_iter().map(run_one).collect()
    } else {
        config.products.iter().map(run_one).collect()
    };

    let output = RunOutput {
        outcomes,
        records_used: records.len(),
    };
    if output.completed().next().is_none() {
        warn!("no product could be forecast");
    }
    Ok(output)
}

/// One product's pipeline: aggregate -> fit -> evaluate -> predict -> report.
pub fn run_product(
    records: &[SalesRecord],
    product: &str,
    engineer: &FeatureEngineer,
    window: &SeriesWindow,
    config: &ForecastConfig,
) -> Result<ProductForecast, ForecastError> {
    let mut series = build_product_series(records, product, window);
    series.sort_chronologically();
    let Some(last) = series.last_period() else {
        return Err(ForecastError::EmptyProductSeries {
            product: product.to_string(),
        });
    };
    info!(product, points = series.len(), "built time series");

    let model = crate::model::fit(&series, engineer)?;
    let evaluation = crate::evaluate::evaluate(&model, engineer, &series)?;
    info!(
        product,
        mae = evaluation.mean_absolute_error,
        r2 = evaluation.r_squared,
        "in-sample evaluation"
    );

    let forecast = crate::forecast::forecast(&model, engineer, last, config.horizon)?;

    let chart = if config.render_charts {
        match crate::plot::render_forecast_chart(
            &config.output_dir,
            &series,
            &forecast,
            (config.chart_width, config.chart_height),
        ) {
            Ok(path) => {
                info!(product, path = %path.display(), "chart written");
                ChartOutcome::Written(path)
            }
            Err(e) => {
                warn!(product, "{e}");
                ChartOutcome::Failed(e)
            }
        }
    } else {
        ChartOutcome::Disabled
    };

    Ok(ProductForecast {
        series,
        model,
        evaluation,
        forecast,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aggregation, YearMonth};

    fn records() -> Vec<SalesRecord> {
        let mut out = Vec::new();
        for year in 2020..=2023 {
            for month in 1..=12 {
                out.push(SalesRecord {
                    product: "Laptop Pro".to_string(),
                    year,
                    month: Some(month),
                    monthly_sales: 1000.0 + 10.0 * f64::from(year - 2020) * 12.0 + 10.0 * f64::from(month),
                });
            }
        }
        out
    }

    fn config(products: &[&str]) -> ForecastConfig {
        ForecastConfig {
            products: products.iter().map(|p| p.to_string()).collect(),
            render_charts: false,
            parallel: false,
            ..ForecastConfig::default()
        }
    }

    #[test]
    fn absent_product_is_skipped_not_fatal() {
        let out = run_forecast_with_records(&records(), &config(&["Ghost", "Laptop Pro"])).unwrap();
        assert_eq!(out.outcomes.len(), 2);
        assert_eq!(out.outcomes[0].product(), "Ghost");
        assert!(matches!(
            out.outcomes[0],
            ProductOutcome::Skipped {
                reason: ForecastError::EmptyProductSeries { .. },
                ..
            }
        ));
        assert_eq!(out.completed().count(), 1);
        assert!(out.models().contains_key("Laptop Pro"));
    }

    #[test]
    fn empty_dataset_is_fatal() {
        let err = run_forecast_with_records(&[], &config(&["Laptop Pro"])).unwrap_err();
        assert!(matches!(err, ForecastError::MissingInputData(_)));
    }

    #[test]
    fn monthly_aggregation_forecasts_after_last_month() {
        let mut cfg = config(&["Laptop Pro"]);
        cfg.aggregation = Aggregation::Monthly;
        cfg.horizon = 3;
        let out = run_forecast_with_records(&records(), &cfg).unwrap();
        let f = out.completed().next().unwrap();
        assert_eq!(f.series.len(), 48);
        assert_eq!(
            f.forecast.periods(),
            vec![
                YearMonth::new(2024, 1).unwrap(),
                YearMonth::new(2024, 2).unwrap(),
                YearMonth::new(2024, 3).unwrap()
            ]
        );
        assert_eq!(f.chart, ChartOutcome::Disabled);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let seq = run_forecast_with_records(&records(), &config(&["Laptop Pro", "Ghost"])).unwrap();
        let mut par_cfg = config(&["Laptop Pro", "Ghost"]);
        par_cfg.parallel = true;
        let par = run_forecast_with_records(&records(), &par_cfg).unwrap();

        let a: Vec<&str> = seq.outcomes.iter().map(ProductOutcome::product).collect();
        let b: Vec<&str> = par.outcomes.iter().map(ProductOutcome::product).collect();
        assert_eq!(a, b);
        let fa = seq.completed().next().unwrap();
        let fb = par.completed().next().unwrap();
        assert_eq!(fa.forecast, fb.forecast);
    }
}
