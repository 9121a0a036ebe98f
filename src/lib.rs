//! `sales-forecast` library crate.
//!
//! The binary (`forecast`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - each stage (aggregation, features, model, periods, evaluation, charts)
//!   can be used on its own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod forecast;
pub mod io;
pub mod math;
pub mod model;
pub mod plot;
pub mod report;
pub mod series;
