//! Per-product linear forecast model.
//!
//! `fit` turns one product's history into a `FittedModel`; `predict` evaluates
//! it on a `FeatureMatrix`. A model remembers the `FeatureSchema` it was fitted
//! with and refuses matrices built any other way.

use tracing::debug;

use crate::domain::ProductSeries;
use crate::error::ForecastError;
use crate::features::{FeatureEngineer, FeatureMatrix, FeatureSchema};
use crate::math::{LinearFit, fit_with_intercept};

/// Learned coefficients for exactly one product.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub product: String,
    pub schema: FeatureSchema,
    pub intercept: f64,
    /// One coefficient per schema column, in schema order.
    pub coefficients: Vec<f64>,
    /// Number of observations used for fitting.
    pub n_obs: usize,
}

impl FittedModel {
    /// True when the fit had no variance to learn from and predicts a constant.
    pub fn is_degenerate(&self) -> bool {
        self.coefficients.iter().all(|b| *b == 0.0)
    }

    /// One prediction per matrix row. Values are not clamped.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ForecastError> {
        if matrix.schema != self.schema {
            return Err(ForecastError::FeatureSchemaMismatch {
                expected: self.schema.to_string(),
                got: matrix.schema.to_string(),
            });
        }

        let fit = LinearFit {
            intercept: self.intercept,
            coefficients: self.coefficients.clone(),
        };
        let out: Vec<f64> = matrix.rows().iter().map(|row| fit.predict_row(row)).collect();

        if out.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::Numerical(format!(
                "non-finite prediction for '{}'",
                self.product
            )));
        }
        Ok(out)
    }
}

/// Fit an OLS model on a single product's history.
///
/// The series does not need to be sorted. With one observation (or no
/// variation in the features) the model degenerates to the mean of the
/// observed sales.
pub fn fit(series: &ProductSeries, engineer: &FeatureEngineer) -> Result<FittedModel, ForecastError> {
    if series.is_empty() {
        return Err(ForecastError::EmptyProductSeries {
            product: series.product.clone(),
        });
    }

    let matrix = engineer.matrix(&series.periods());
    let y = series.sales();

    let fit = fit_with_intercept(&matrix.rows(), &y).ok_or_else(|| {
        ForecastError::Numerical(format!(
            "least-squares solve failed for '{}' ({} observations)",
            series.product,
            y.len()
        ))
    })?;

    debug!(
        product = %series.product,
        n = y.len(),
        intercept = fit.intercept,
        "fitted linear model"
    );

    Ok(FittedModel {
        product: series.product.clone(),
        schema: matrix.schema,
        intercept: fit.intercept,
        coefficients: fit.coefficients,
        n_obs: y.len(),
    })
}
