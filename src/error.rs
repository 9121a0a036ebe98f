//! Error types.
//!
//! - `ForecastError` is what the library returns. Each variant maps to a
//!   distinct failure mode of the forecasting pipeline.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the forecasting pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// The dataset (or a file it depends on) is absent or empty.
    #[error("missing input data: {0}")]
    MissingInputData(String),

    /// A requested product has no historical points in the window.
    #[error("product '{product}' has no historical points")]
    EmptyProductSeries { product: String },

    /// Features handed to a model were built differently from the fit-time features.
    #[error("feature schema mismatch: model was fitted on {expected}, got {got}")]
    FeatureSchemaMismatch { expected: String, got: String },

    /// The chart could not be written. Numeric results are unaffected.
    #[error("failed to render chart '{}': {message}", .path.display())]
    RenderFailure { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("numerical error: {0}")]
    Numerical(String),
}

impl ForecastError {
    /// Process exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            ForecastError::InvalidConfig(_) | ForecastError::FeatureSchemaMismatch { .. } => 2,
            ForecastError::MissingInputData(_) | ForecastError::EmptyProductSeries { .. } => 3,
            ForecastError::RenderFailure { .. } | ForecastError::Numerical(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_errors_map_to_exit_codes() {
        let err = ForecastError::MissingInputData("sales.csv".to_string());
        let app: AppError = err.clone().into();
        assert_eq!(app.exit_code(), 3);
        assert_eq!(app.to_string(), err.to_string());

        let render = ForecastError::RenderFailure {
            path: PathBuf::from("out/forecast_X.svg"),
            message: "denied".to_string(),
        };
        assert_eq!(render.exit_code(), 4);
        assert!(render.to_string().contains("out/forecast_X.svg"));
    }
}
