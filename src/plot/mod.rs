//! Chart output.

pub mod chart;

pub use chart::*;
