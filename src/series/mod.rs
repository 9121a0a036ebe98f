//! Time-series construction from raw sales records.

pub mod builder;

pub use builder::*;
