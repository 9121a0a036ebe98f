//! Shared domain types.
//!
//! These types are intentionally kept small and plain so they can be:
//!
//! - read from / written to CSV
//! - passed between pipeline stages by value
//! - rendered into summaries and charts

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Products forecast when none are requested explicitly.
pub const DEFAULT_PRODUCTS: [&str; 3] = ["Laptop Pro", "Smartphone X", "Wireless Headphones"];

/// A calendar month.
///
/// Ordering is chronological. The month is always in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=MONTHS_PER_YEAR)
            .contains(&month)
            .then_some(Self { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Months elapsed since January of year 0.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * i64::from(MONTHS_PER_YEAR) + i64::from(self.month - 1)
    }

    /// The period `n` months after this one.
    ///
    /// Zero-based month arithmetic: `total = month + n`,
    /// `month' = ((total - 1) mod 12) + 1`, `year' = year + (total - 1) div 12`.
    pub fn plus_months(self, n: u32) -> Self {
        let total = i64::from(self.month) + i64::from(n);
        let month = ((total - 1) % i64::from(MONTHS_PER_YEAR)) + 1;
        let year = i64::from(self.year) + (total - 1) / i64::from(MONTHS_PER_YEAR);
        Self {
            year: year as i32,
            month: month as u32,
        }
    }

    pub fn next(self) -> Self {
        self.plus_months(1)
    }

    /// First day of the month.
    ///
    /// Falls back to the default date only for years outside chrono's range.
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// How raw records are averaged into monthly points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Average every record of the year and repeat that value for each month.
    ///
    /// This flattens intra-year variation; it is kept as the default because
    /// the historical forecasts were produced this way.
    Yearly,
    /// Average records per (year, month).
    Monthly,
}

/// One row of the external sales table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Product_Name")]
    pub product: String,
    #[serde(rename = "Year")]
    pub year: i32,
    /// Absent when the dataset carries neither a month nor a date column.
    #[serde(rename = "Month")]
    pub month: Option<u32>,
    #[serde(rename = "Monthly_Sales")]
    pub monthly_sales: f64,
}

/// One aggregated monthly observation for a product.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub period: YearMonth,
    /// Mean of the matching records, truncated toward zero.
    pub monthly_sales: i64,
}

impl TimeSeriesPoint {
    pub fn new(period: YearMonth, monthly_sales: i64) -> Self {
        Self {
            date: period.first_day(),
            period,
            monthly_sales,
        }
    }

    pub fn year(&self) -> i32 {
        self.period.year()
    }

    pub fn month(&self) -> u32 {
        self.period.month()
    }
}

/// All historical points of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSeries {
    pub product: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl ProductSeries {
    pub fn new(product: impl Into<String>, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            product: product.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sort points by date. Build order is not guaranteed to be chronological.
    pub fn sort_chronologically(&mut self) {
        self.points.sort_by_key(|p| p.period);
    }

    pub fn periods(&self) -> Vec<YearMonth> {
        self.points.iter().map(|p| p.period).collect()
    }

    pub fn sales(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.monthly_sales as f64).collect()
    }

    /// Chronologically last observed period.
    pub fn last_period(&self) -> Option<YearMonth> {
        self.points.iter().map(|p| p.period).max()
    }

    pub fn first_period(&self) -> Option<YearMonth> {
        self.points.iter().map(|p| p.period).min()
    }
}

/// A single forecast value.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub period: YearMonth,
    /// Not clamped: sparse or noisy histories can produce negative values.
    pub predicted_sales: f64,
}

/// Ordered forecasts for the requested horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub product: String,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn periods(&self) -> Vec<YearMonth> {
        self.points.iter().map(|p| p.period).collect()
    }

    /// `(min, max)` of the predicted values, `None` for an empty forecast.
    pub fn predicted_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.predicted_sales);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// In-sample accuracy of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub mean_absolute_error: f64,
    pub r_squared: f64,
    pub rmse: f64,
    pub n: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub data_path: PathBuf,
    pub products: Vec<String>,

    pub year_start: i32,
    pub year_end: i32,
    pub month_start: u32,
    pub month_end: u32,
    pub aggregation: Aggregation,

    /// Normalization origin: `year_normalized = (year - base_year) / year_span`.
    pub base_year: i32,
    pub year_span: f64,

    /// Number of months to forecast after the last observed period.
    pub horizon: usize,

    pub output_dir: PathBuf,
    pub render_charts: bool,
    pub chart_width: u32,
    pub chart_height: u32,

    /// Process products on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("cleaned_sales_data.csv"),
            products: DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect(),
            year_start: 2020,
            year_end: 2023,
            month_start: 1,
            month_end: 12,
            aggregation: Aggregation::Yearly,
            base_year: 2020,
            year_span: 3.0,
            horizon: 12,
            output_dir: PathBuf::from("."),
            render_charts: true,
            chart_width: 1000,
            chart_height: 600,
            parallel: true,
        }
    }
}

impl ForecastConfig {
    pub fn years(&self) -> RangeInclusive<i32> {
        self.year_start..=self.year_end
    }

    pub fn months(&self) -> RangeInclusive<u32> {
        self.month_start..=self.month_end
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.year_end < self.year_start {
            return Err(ForecastError::InvalidConfig(format!(
                "year range {}..={} is empty",
                self.year_start, self.year_end
            )));
        }
        if self.month_start < 1 || self.month_end > MONTHS_PER_YEAR || self.month_end < self.month_start {
            return Err(ForecastError::InvalidConfig(format!(
                "month range {}..={} must lie within 1..=12",
                self.month_start, self.month_end
            )));
        }
        if !(self.year_span.is_finite() && self.year_span != 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "year span must be finite and non-zero, got {}",
                self.year_span
            )));
        }
        if self.horizon == 0 {
            return Err(ForecastError::InvalidConfig("horizon must be at least 1 month".to_string()));
        }
        if self.products.is_empty() {
            return Err(ForecastError::InvalidConfig("no products requested".to_string()));
        }
        if self.render_charts && (self.chart_width < 100 || self.chart_height < 100) {
            return Err(ForecastError::InvalidConfig(format!(
                "chart size {}x{} is too small (minimum 100x100)",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_rejects_out_of_range_months() {
        assert!(YearMonth::new(2023, 0).is_none());
        assert!(YearMonth::new(2023, 13).is_none());
        assert!(YearMonth::new(2023, 12).is_some());
    }

    #[test]
    fn year_month_orders_chronologically() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = YearMonth::new(2024, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(jan.ordinal() - dec.ordinal(), 1);
        assert_eq!(dec.next(), jan);
        assert_eq!(jan.to_string(), "2024-01");
        assert_eq!(jan.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn series_sorts_and_reports_last_period() {
        let mut series = ProductSeries::new(
            "Widget",
            vec![
                TimeSeriesPoint::new(YearMonth::new(2021, 3).unwrap(), 30),
                TimeSeriesPoint::new(YearMonth::new(2020, 11).unwrap(), 10),
                TimeSeriesPoint::new(YearMonth::new(2021, 1).unwrap(), 20),
            ],
        );
        series.sort_chronologically();
        assert_eq!(series.sales(), vec![10.0, 20.0, 30.0]);
        assert_eq!(series.last_period(), YearMonth::new(2021, 3));
        assert_eq!(series.first_period(), YearMonth::new(2020, 11));
    }

    #[test]
    fn default_config_is_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.years().count(), 4);
        assert_eq!(config.months().count(), 12);
    }

    #[test]
    fn config_rejects_zero_span_and_horizon() {
        let mut config = ForecastConfig::default();
        config.year_span = 0.0;
        assert!(matches!(config.validate(), Err(ForecastError::InvalidConfig(_))));

        let mut config = ForecastConfig::default();
        config.horizon = 0;
        assert!(matches!(config.validate(), Err(ForecastError::InvalidConfig(_))));

        let mut config = ForecastConfig::default();
        config.month_end = 13;
        assert!(config.validate().is_err());
    }
}
