//! Forecast models.
//!
//! One linear model per product, fitted independently. Models are plain values
//! keyed by product name; nothing is shared between products.

pub mod linear;

pub use linear::*;
