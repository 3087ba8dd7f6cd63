//! Case preparation: archive extraction, step listing and track parsing.
//!
//! A case ships as a zip archive of NetCDF files, one per time step and
//! named `YYYYMMDDHH.nc`. After extraction the sorted listing gives the
//! steps in time order; the first one is the genesis step.

pub mod archive;
pub mod error;
pub mod steps;
pub mod track;

// Re-exports
pub use archive::{genesis_step, list_files, unzip};
pub use error::{IngestionError, Result};
pub use steps::{parse_date_code, step_time};
pub use track::{parse_track, read_track_data, TrackData, TrackHeader, TrackRecord};
