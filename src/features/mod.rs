//! Calendar feature engineering.
//!
//! Every period `(year, month)` maps to the same fixed feature row:
//!
//! | column            | value                          |
//! |-------------------|--------------------------------|
//! | `year`            | `year`                         |
//! | `month`           | `month`                        |
//! | `year_normalized` | `(year - base_year) / span`    |
//! | `sin_month`       | `sin(2π · month / 12)`         |
//! | `cos_month`       | `cos(2π · month / 12)`         |
//!
//! The sine/cosine pair makes December and January numerically adjacent.
//!
//! A model is only valid for rows built with the exact normalization it was
//! fitted with, so rows always travel inside a `FeatureMatrix` tagged with its
//! `FeatureSchema`, and models compare schemas before predicting.

use std::f64::consts::PI;
use std::fmt;

use crate::domain::{ForecastConfig, MONTHS_PER_YEAR, YearMonth};
use crate::error::ForecastError;

/// Column names in design-row order.
pub const FEATURE_NAMES: [&str; 5] = ["year", "month", "year_normalized", "sin_month", "cos_month"];

/// Feature layout plus the normalization parameters used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    pub names: Vec<&'static str>,
    pub base_year: i32,
    pub year_span: f64,
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] (base_year={}, span={})",
            self.names.join(", "),
            self.base_year,
            self.year_span
        )
    }
}

/// Engineered features for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub year: i32,
    pub month: u32,
    pub year_normalized: f64,
    pub sin_month: f64,
    pub cos_month: f64,
}

impl FeatureVector {
    /// Design row in `FEATURE_NAMES` order.
    pub fn to_row(&self) -> Vec<f64> {
        vec![
            f64::from(self.year),
            f64::from(self.month),
            self.year_normalized,
            self.sin_month,
            self.cos_month,
        ]
    }
}

/// Feature rows tagged with the schema that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub schema: FeatureSchema,
    pub vectors: Vec<FeatureVector>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.vectors.iter().map(FeatureVector::to_row).collect()
    }
}

/// Builds feature vectors with a fixed normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEngineer {
    base_year: i32,
    year_span: f64,
}

impl FeatureEngineer {
    pub fn new(base_year: i32, year_span: f64) -> Result<Self, ForecastError> {
        if !(year_span.is_finite() && year_span != 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "year span must be finite and non-zero, got {year_span}"
            )));
        }
        Ok(Self { base_year, year_span })
    }

    pub fn from_config(config: &ForecastConfig) -> Result<Self, ForecastError> {
        Self::new(config.base_year, config.year_span)
    }

    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema {
            names: FEATURE_NAMES.to_vec(),
            base_year: self.base_year,
            year_span: self.year_span,
        }
    }

    pub fn features(&self, period: YearMonth) -> FeatureVector {
        let year = period.year();
        let month = period.month();
        let angle = 2.0 * PI * f64::from(month) / f64::from(MONTHS_PER_YEAR);
        FeatureVector {
            year,
            month,
            year_normalized: f64::from(year - self.base_year) / self.year_span,
            sin_month: angle.sin(),
            cos_month: angle.cos(),
        }
    }

    pub fn matrix(&self, periods: &[YearMonth]) -> FeatureMatrix {
        FeatureMatrix {
            schema: self.schema(),
            vectors: periods.iter().map(|&p| self.features(p)).collect(),
        }
    }
}
