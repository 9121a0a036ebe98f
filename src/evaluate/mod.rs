//! In-sample accuracy metrics.
//!
//! The model is scored on the same history it was fitted on, so these numbers
//! are optimistic. They describe fit quality, not out-of-sample skill.
//!
//! R² policy for a constant history (`SS_tot = 0`): 1.0 when the residuals are
//! also zero, otherwise 0.0.

use crate::domain::{EvaluationResult, ProductSeries};
use crate::error::ForecastError;
use crate::features::FeatureEngineer;
use crate::model::FittedModel;

/// Score a fitted model against the series it was fitted on.
///
/// `engineer` must be the fit-time engineer; a different normalization is a
/// `FeatureSchemaMismatch`.
pub fn evaluate(
    model: &FittedModel,
    engineer: &FeatureEngineer,
    series: &ProductSeries,
) -> Result<EvaluationResult, ForecastError> {
    if series.is_empty() {
        return Err(ForecastError::EmptyProductSeries {
            product: series.product.clone(),
        });
    }

    let predicted = model.predict(&engineer.matrix(&series.periods()))?;
    let actual = series.sales();
    Ok(metrics(&actual, &predicted))
}

/// MAE, RMSE and R² of `predicted` against `actual`.
///
/// Both slices must be non-empty and of equal length.
pub fn metrics(actual: &[f64], predicted: &[f64]) -> EvaluationResult {
    debug_assert_eq!(actual.len(), predicted.len());
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return EvaluationResult {
            mean_absolute_error: 0.0,
            r_squared: 1.0,
            rmse: 0.0,
            n: 0,
        };
    }
    let nf = n as f64;

    let pairs = || actual.iter().zip(predicted.iter()).take(n);

    let mae = pairs().map(|(a, p)| (a - p).abs()).sum::<f64>() / nf;
    let ss_res = pairs().map(|(a, p)| (a - p).powi(2)).sum::<f64>();

    let mean = actual[..n].iter().sum::<f64>() / nf;
    let ss_tot = actual[..n].iter().map(|a| (a - mean).powi(2)).sum::<f64>();

    EvaluationResult {
        mean_absolute_error: mae,
        r_squared: r_squared(ss_res, ss_tot),
        rmse: (ss_res / nf).sqrt(),
        n,
    }
}

fn r_squared(ss_res: f64, ss_tot: f64) -> f64 {
    if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeSeriesPoint, YearMonth};
    use crate::model::fit;

    #[test]
    fn perfect_predictions_score_one() {
        let actual = [10.0, 20.0, 35.0];
        let m = metrics(&actual, &actual);
        assert_eq!(m.mean_absolute_error, 0.0);
        assert_eq!(m.r_squared, 1.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.n, 3);
    }

    #[test]
    fn known_values() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.5, 2.0, 2.5, 5.0];
        let m = metrics(&actual, &predicted);
        assert!((m.mean_absolute_error - 0.5).abs() < 1e-12);
        // ss_res = 0.25 + 0 + 0.25 + 1 = 1.5, ss_tot = 5
        assert!((m.r_squared - 0.7).abs() < 1e-12);
    }

    #[test]
    fn constant_actuals_use_sentinel() {
        let actual = [5.0, 5.0];
        assert_eq!(metrics(&actual, &[5.0, 5.0]).r_squared, 1.0);
        assert_eq!(metrics(&actual, &[4.0, 6.0]).r_squared, 0.0);
    }

    #[test]
    fn poor_model_can_go_negative() {
        let m = metrics(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]);
        assert!(m.r_squared < 0.0);
    }

    #[test]
    fn evaluates_fitted_model_in_sample() {
        let eng = FeatureEngineer::new(2020, 3.0).unwrap();
        let series = ProductSeries::new(
            "Widget",
            (2020..=2023)
                .flat_map(|y| (1..=12).map(move |m| (y, m)))
                .map(|(y, m)| TimeSeriesPoint::new(YearMonth::new(y, m).unwrap(), 500 + 50 * i64::from(y - 2020)))
                .collect(),
        );
        let model = fit(&series, &eng).unwrap();
        let eval = evaluate(&model, &eng, &series).unwrap();
        assert!(eval.mean_absolute_error < 1e-6);
        assert!((eval.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(eval.n, 48);
    }

    #[test]
    fn evaluating_with_other_normalization_fails() {
        let eng = FeatureEngineer::new(2020, 3.0).unwrap();
        let other = FeatureEngineer::new(2020, 4.0).unwrap();
        let series = ProductSeries::new("W", vec![TimeSeriesPoint::new(YearMonth::new(2021, 2).unwrap(), 7)]);
        let model = fit(&series, &eng).unwrap();
        let err = evaluate(&model, &other, &series).unwrap_err();
        assert!(matches!(err, ForecastError::FeatureSchemaMismatch { .. }));
    }
}
