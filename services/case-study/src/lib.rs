//! Moisture-uptake case study.
//!
//! Extracts a case archive, plots the integrated moisture uptake of the
//! genesis step on a map and plots a cross-section of the layered uptake
//! along a transect.

pub mod config;
pub mod config_loader;
pub mod pipeline;

pub use config::{CaseConfig, TransectConfig, VariableNames};
pub use config_loader::{load_case_config, parse_case_config};
pub use pipeline::{run_case, CaseOutputs};
