//! Aggregate raw sales records into per-product monthly series.
//!
//! For each requested product and each year of the window we look at the
//! matching records and emit one point per month of the window:
//!
//! - `Aggregation::Yearly`: the mean over *all* of the year's records, repeated
//!   for every month. Intra-year variation is flattened.
//! - `Aggregation::Monthly`: the mean over the records of that month only.
//!   Months without records (or records without a month) produce no point.
//!
//! Means are truncated toward zero. A product/year (or month) without records is
//! skipped silently; an entirely absent product yields an empty series.
//!
//! Output is product-major, then year, then month. Callers that need
//! chronological order must sort (`ProductSeries::sort_chronologically`).

use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::debug;

use crate::domain::{Aggregation, ForecastConfig, ProductSeries, SalesRecord, TimeSeriesPoint, YearMonth};

/// The historical window and aggregation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesWindow {
    pub years: RangeInclusive<i32>,
    pub months: RangeInclusive<u32>,
    pub aggregation: Aggregation,
}

impl SeriesWindow {
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            years: config.years(),
            months: config.months(),
            aggregation: config.aggregation,
        }
    }
}

impl Default for SeriesWindow {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn truncated_mean(&self) -> Option<i64> {
        (self.count > 0).then(|| (self.sum / self.count as f64).trunc() as i64)
    }
}

/// Build one series per requested product, in the requested order.
pub fn build_time_series(records: &[SalesRecord], products: &[String], window: &SeriesWindow) -> Vec<ProductSeries> {
    products
        .iter()
        .map(|product| build_product_series(records, product, window))
        .collect()
}

/// Build the series of a single product.
pub fn build_product_series(records: &[SalesRecord], product: &str, window: &SeriesWindow) -> ProductSeries {
    let matching = records.iter().filter(|r| r.product == product);

    let points = match window.aggregation {
        Aggregation::Yearly => {
            let mut by_year: HashMap<i32, Accumulator> = HashMap::new();
            for r in matching {
                by_year.entry(r.year).or_default().push(r.monthly_sales);
            }

            let mut points = Vec::new();
            for year in window.years.clone() {
                let Some(mean) = by_year.get(&year).and_then(Accumulator::truncated_mean) else {
                    continue;
                };
                for month in window.months.clone() {
                    if let Some(period) = YearMonth::new(year, month) {
                        points.push(TimeSeriesPoint::new(period, mean));
                    }
                }
            }
            points
        }
        Aggregation::Monthly => {
            let mut by_month: HashMap<(i32, u32), Accumulator> = HashMap::new();
            let mut without_month = 0usize;
            for r in matching {
                match r.month {
                    Some(m) => by_month.entry((r.year, m)).or_default().push(r.monthly_sales),
                    None => without_month += 1,
                }
            }
            if without_month > 0 {
                debug!(product, without_month, "ignored records without a month");
            }

            let mut points = Vec::new();
            for year in window.years.clone() {
                for month in window.months.clone() {
                    let mean = by_month.get(&(year, month)).and_then(Accumulator::truncated_mean);
                    if let (Some(mean), Some(period)) = (mean, YearMonth::new(year, month)) {
                        points.push(TimeSeriesPoint::new(period, mean));
                    }
                }
            }
            points
        }
    };

    ProductSeries::new(product, points)
}
