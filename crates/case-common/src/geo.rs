//! Geographic points.

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point, rejecting latitudes outside [-90, 90] and non-finite values.
    pub fn checked(lat: f64, lon: f64) -> CommonResult<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CommonError::InvalidCoordinate(format!("({lat}, {lon})")));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CommonError::InvalidCoordinate(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        Ok(Self { lat, lon })
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Tuples are (lat, lon), matching how case endpoints are written.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}
