//! Out-of-sample forecasting.
//!
//! Generate the periods after the last observation, engineer their features
//! with the fit-time engineer, and evaluate the model on them.

pub mod periods;

pub use periods::*;

use crate::domain::{ForecastPoint, ForecastResult, YearMonth};
use crate::error::ForecastError;
use crate::features::FeatureEngineer;
use crate::model::FittedModel;

/// Predict `horizon` months after `last`.
pub fn forecast(
    model: &FittedModel,
    engineer: &FeatureEngineer,
    last: YearMonth,
    horizon: usize,
) -> Result<ForecastResult, ForecastError> {
    if horizon == 0 {
        return Err(ForecastError::InvalidConfig("horizon must be at least 1 month".to_string()));
    }

    let periods = future_periods(last, horizon);
    let predicted = model.predict(&engineer.matrix(&periods))?;

    let points = periods
        .into_iter()
        .zip(predicted)
        .map(|(period, predicted_sales)| ForecastPoint {
            date: period.first_day(),
            period,
            predicted_sales,
        })
        .collect();

    Ok(ForecastResult {
        product: model.product.clone(),
        points,
    })
}
