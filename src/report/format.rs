//! Formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation concerns and output changes are localized.

use crate::app::pipeline::{ChartOutcome, ProductForecast, RunOutput};
use crate::domain::ForecastConfig;

/// Format the full run summary: configuration, one block per product, skips, files.
pub fn format_run_summary(run: &RunOutput, config: &ForecastConfig) -> String {
    let mut out = String::new();

    out.push_str("=== forecast - Monthly Sales Forecast ===\n");
    out.push_str(&format!(
        "Window: {}..={} | months {}..={} | aggregation: {:?}\n",
        config.year_start, config.year_end, config.month_start, config.month_end, config.aggregation
    ));
    out.push_str(&format!(
        "Features: base_year={} span={} | horizon: {} months\n",
        config.base_year, config.year_span, config.horizon
    ));
    out.push_str(&format!("Records: {}\n", run.records_used));

    for forecast in run.completed() {
        out.push('\n');
        out.push_str(&format_product(forecast));
    }

    let skipped: Vec<_> = run.skipped().collect();
    if !skipped.is_empty() {
        out.push_str("\nSkipped:\n");
        for (product, reason) in skipped {
            out.push_str(&format!("- {product}: {reason}\n"));
        }
    }

    let charts: Vec<String> = run
        .completed()
        .filter_map(|f| match &f.chart {
            ChartOutcome::Written(path) => Some(path.display().to_string()),
            _ => None,
        })
        .collect();
    if !charts.is_empty() {
        out.push_str("\nGenerated files:\n");
        for c in charts {
            out.push_str(&format!("  - {c}\n"));
        }
    }

    out.push_str(&format!(
        "\nForecast completed for {} of {} products.\n",
        run.completed().count(),
        run.outcomes.len()
    ));
    out
}

/// Format one product's block.
pub fn format_product(f: &ProductForecast) -> String {
    let mut out = String::new();
    let product = &f.series.product;

    out.push_str(&format!("--- {product} ---\n"));
    out.push_str(&format!("Data points: {}\n", f.series.len()));
    if let (Some(first), Some(last)) = (f.series.first_period(), f.series.last_period()) {
        out.push_str(&format!("Date range: {first} to {last}\n"));
    }
    if f.model.is_degenerate() {
        out.push_str("Model: constant (no variance to fit)\n");
    }

    out.push_str("Model performance (in-sample):\n");
    out.push_str(&format!("  Mean Absolute Error: {:.2}\n", f.evaluation.mean_absolute_error));
    out.push_str(&format!("  R² Score: {:.3}\n", f.evaluation.r_squared));

    if let (Some(first), Some(last)) = (f.forecast.points.first(), f.forecast.points.last()) {
        out.push_str(&format!("Forecast range: {} to {}\n", first.period, last.period));
    }
    if let Some((lo, hi)) = f.forecast.predicted_range() {
        out.push_str(&format!("Predicted sales range: {lo:.0} - {hi:.0}\n"));
    }

    out.push_str(&format_forecast_table(f));

    match &f.chart {
        ChartOutcome::Written(path) => out.push_str(&format!("Chart: {}\n", path.display())),
        ChartOutcome::Failed(e) => out.push_str(&format!("Chart: not written ({e})\n")),
        ChartOutcome::Disabled => {}
    }
    out
}

fn format_forecast_table(f: &ProductForecast) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<10} {:>14}\n", "period", "predicted").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<14}\n", "", "").trim_end());
    out.push('\n');
    for p in &f.forecast.points {
        out.push_str(format!("{:<10} {:>14.2}\n", p.period.to_string(), p.predicted_sales).trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_forecast_with_records;
    use crate::domain::SalesRecord;

    fn run() -> (RunOutput, ForecastConfig) {
        let records: Vec<SalesRecord> = (2020..=2023)
            .map(|year| SalesRecord {
                product: "Smartphone X".to_string(),
                year,
                month: None,
                monthly_sales: 100.0 * f64::from(year - 2019),
            })
            .collect();
        let config = ForecastConfig {
            products: vec!["Smartphone X".to_string(), "Ghost".to_string()],
            render_charts: false,
            parallel: false,
            horizon: 2,
            ..ForecastConfig::default()
        };
        (run_forecast_with_records(&records, &config).unwrap(), config)
    }

    #[test]
    fn summary_lists_products_and_skips() {
        let (run, config) = run();
        let text = format_run_summary(&run, &config);
        assert!(text.contains("--- Smartphone X ---"));
        assert!(text.contains("Date range: 2020-01 to 2023-12"));
        assert!(text.contains("Forecast range: 2024-01 to 2024-02"));
        assert!(text.contains("Skipped:\n- Ghost:"));
        assert!(text.contains("Forecast completed for 1 of 2 products."));
    }

    #[test]
    fn forecast_table_has_one_row_per_period() {
        let (run, _) = run();
        let f = run.completed().next().unwrap();
        let table = format_forecast_table(f);
        assert_eq!(table.lines().count(), 2 + f.forecast.points.len());
        assert!(table.lines().nth(2).unwrap().starts_with("2024-01"));
    }
}
