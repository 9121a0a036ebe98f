//! Dataset sources other than user-supplied CSV files.

pub mod synthetic;

pub use synthetic::*;
