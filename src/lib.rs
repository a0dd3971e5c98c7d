//! simregress - regression comparison harness for simulation result files
//!
//! This library extracts physical signals (surge, heave, pitch) from
//! hierarchical result containers, aligns them against reference baselines,
//! scores them with a normalized RMS error and reports PASS/FAIL per case.

pub mod adapter;
pub mod baseline;
pub mod cli;
pub mod compare;
pub mod config;
pub mod container;
pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod report;
pub mod series;

pub use error::{RegressError, Result};
