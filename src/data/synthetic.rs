//! Synthetic sales table generation.
//!
//! Each product follows a deterministic baseline
//!
//! `sales(year, month) = base · (1 + growth)^(year - first_year) · (1 + amplitude · sin(2π · month / 12))`
//!
//! perturbed by mean-preserving log-normal noise. The generator is seeded, so
//! the same configuration always produces the same table.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{MONTHS_PER_YEAR, SalesRecord};
use crate::error::AppError;

/// Baseline shape of one synthetic product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductProfile {
    pub name: String,
    /// Average monthly sales in the first year.
    pub base_sales: f64,
    /// Year-over-year growth rate (0.08 = +8% per year).
    pub annual_growth: f64,
    /// Relative size of the seasonal swing.
    pub seasonal_amplitude: f64,
}

impl ProductProfile {
    fn new(name: &str, base_sales: f64, annual_growth: f64, seasonal_amplitude: f64) -> Self {
        Self {
            name: name.to_string(),
            base_sales,
            annual_growth,
            seasonal_amplitude,
        }
    }

    /// Noise-free expected sales.
    pub fn expected_sales(&self, first_year: i32, year: i32, month: u32) -> f64 {
        let trend = (1.0 + self.annual_growth).powi(year - first_year);
        let angle = 2.0 * PI * f64::from(month) / f64::from(MONTHS_PER_YEAR);
        self.base_sales * trend * (1.0 + self.seasonal_amplitude * angle.sin())
    }
}

pub fn default_profiles() -> Vec<ProductProfile> {
    vec![
        ProductProfile::new("Laptop Pro", 1200.0, 0.08, 0.15),
        ProductProfile::new("Smartphone X", 2500.0, 0.05, 0.20),
        ProductProfile::new("Wireless Headphones", 1800.0, 0.12, 0.25),
        ProductProfile::new("Smart Watch", 900.0, 0.15, 0.10),
        ProductProfile::new("Tablet Air", 1100.0, 0.03, 0.12),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub profiles: Vec<ProductProfile>,
    pub year_start: i32,
    pub year_end: i32,
    /// Transactions recorded per product and month.
    pub records_per_month: usize,
    /// Log-scale standard deviation of the noise (0 disables noise).
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            year_start: 2020,
            year_end: 2023,
            records_per_month: 5,
            noise_sigma: 0.1,
            seed: 42,
        }
    }
}

/// Generate a sales table, product-major then chronological.
pub fn generate_records(config: &SyntheticConfig) -> Result<Vec<SalesRecord>, AppError> {
    if config.profiles.is_empty() {
        return Err(AppError::new(2, "At least one product profile is required."));
    }
    if config.year_end < config.year_start {
        return Err(AppError::new(2, "Invalid year range for dataset generation."));
    }
    if config.records_per_month == 0 {
        return Err(AppError::new(2, "Records per month must be > 0."));
    }
    if !(config.noise_sigma.is_finite() && config.noise_sigma >= 0.0) {
        return Err(AppError::new(2, "Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(dataset_seed(config));
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    // Mean correction so E[exp(σz - σ²/2)] == 1.0 (keeps the baseline unbiased).
    let sigma = config.noise_sigma;
    let correction = 0.5 * sigma * sigma;

    let months = (config.year_end - config.year_start + 1) as usize * MONTHS_PER_YEAR as usize;
    let mut records = Vec::with_capacity(config.profiles.len() * months * config.records_per_month);

    for profile in &config.profiles {
        for year in config.year_start..=config.year_end {
            for month in 1..=MONTHS_PER_YEAR {
                let expected = profile.expected_sales(config.year_start, year, month).max(0.0);
                for _ in 0..config.records_per_month {
                    let z: f64 = normal.sample(&mut rng);
                    let sales = (expected * (sigma * z - correction).exp()).round().max(0.0);
                    records.push(SalesRecord {
                        product: profile.name.clone(),
                        year,
                        month: Some(month),
                        monthly_sales: sales,
                    });
                }
            }
        }
    }

    Ok(records)
}

/// Write records as `Product_Name,Year,Month,Monthly_Sales` rows.
pub fn write_sales_csv(path: &Path, records: &[SalesRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create dataset CSV '{}': {e}", path.display())))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush dataset CSV: {e}")))?;
    Ok(())
}

fn dataset_seed(config: &SyntheticConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.seed.hash(&mut hasher);
    config.year_start.hash(&mut hasher);
    config.year_end.hash(&mut hasher);
    config.records_per_month.hash(&mut hasher);
    config.noise_sigma.to_bits().hash(&mut hasher);
    for p in &config.profiles {
        p.name.hash(&mut hasher);
        p.base_sales.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
