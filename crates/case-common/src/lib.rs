//! Common types shared across the case-study crates.

pub mod bbox;
pub mod error;
pub mod field;
pub mod geo;
pub mod grid;

pub use bbox::BoundingBox;
pub use error::{CommonError, CommonResult};
pub use field::{GriddedField, LayeredField};
pub use geo::GeoPoint;
pub use grid::{Axis, LatLonGrid};
