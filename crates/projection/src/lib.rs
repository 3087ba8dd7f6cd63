//! Geographic math for the case plots.
//!
//! - [`geodesic`]: great-circle paths between two points, the sampling line
//!   of vertical cross-sections
//! - [`plate_carree`]: the equirectangular map used by the moisture map,
//!   mapping a lon/lat extent linearly onto a pixel rectangle

pub mod error;
pub mod geodesic;
pub mod plate_carree;

pub use error::{ProjectionError, ProjectionResult};
pub use geodesic::{geodesic_path, great_circle_distance, EARTH_RADIUS};
pub use plate_carree::PlateCarree;
