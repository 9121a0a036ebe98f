//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - calendar periods (`YearMonth`)
//! - input rows and aggregated observations (`SalesRecord`, `TimeSeriesPoint`, `ProductSeries`)
//! - pipeline outputs (`ForecastResult`, `EvaluationResult`)
//! - run configuration (`ForecastConfig`, `Aggregation`)

pub mod types;

pub use types::*;
