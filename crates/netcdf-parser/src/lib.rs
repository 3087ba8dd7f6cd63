//! NetCDF access for moisture-uptake case files.
//!
//! Reads the gridded moisture-flux fields of a case time step, the storm
//! mask, and writes the single-variable sub-dataset that feeds the
//! cross-section interpolation.
//!
//! # Implementation Notes
//!
//! Uses the native `netcdf` crate (libnetcdf + HDF5). HDF5's own diagnostic
//! printing is disabled once per process before any file is touched.
//!
//! # Case file layout
//!
//! Each time step holds 1-D `lat`/`lon` coordinates, the integrated uptake
//! `E_P_integrated(lat, lon)` and its per-layer breakdown
//! `E_P_integrated_layers(layers, lat, lon)`, optionally with a leading
//! singleton `time` dimension.

pub mod error;
pub mod extract;
pub mod native;
pub mod reader;

pub use error::{NetCdfError, NetCdfResult};
pub use extract::{array_for_transversal, ExtractionSummary};
pub use native::silence_hdf5_errors;
pub use reader::{
    list_variables, read_gridded_field, read_layered_field, read_mask_shape, CaseDataset,
    MaskShape,
};

/// Latitude coordinate of case files.
pub const LAT_VAR: &str = "lat";
/// Longitude coordinate of case files.
pub const LON_VAR: &str = "lon";
/// Vertically integrated moisture uptake.
pub const INTEGRATED_VAR: &str = "E_P_integrated";
/// Moisture uptake per vertical layer.
pub const LAYERS_VAR: &str = "E_P_integrated_layers";
