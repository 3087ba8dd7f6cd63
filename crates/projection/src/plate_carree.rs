//! Plate Carrée (equirectangular) map area.
//!
//! Longitude maps linearly to x and latitude to y inside a pixel rectangle.
//! Pixel (0, 0) is the top-left corner, so y grows southward.

use case_common::{BoundingBox, GeoPoint};

use crate::error::{ProjectionError, ProjectionResult};

/// A lon/lat extent drawn into a `width` x `height` pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    pub extent: BoundingBox,
    pub width: u32,
    pub height: u32,
}

impl PlateCarree {
    pub fn new(extent: BoundingBox, width: u32, height: u32) -> ProjectionResult<Self> {
        if !extent.is_valid() {
            return Err(ProjectionError::InvalidExtent(format!(
                "{:?} has zero or negative size",
                extent
            )));
        }
        if width == 0 || height == 0 {
            return Err(ProjectionError::InvalidExtent(format!(
                "pixel area {}x{} is empty",
                width, height
            )));
        }
        Ok(Self {
            extent,
            width,
            height,
        })
    }

    /// Degrees of longitude per pixel.
    pub fn lon_per_pixel(&self) -> f64 {
        self.extent.width() / self.width as f64
    }

    /// Degrees of latitude per pixel.
    pub fn lat_per_pixel(&self) -> f64 {
        self.extent.height() / self.height as f64
    }

    /// Continuous pixel position of a geographic point. Points outside the
    /// extent map outside `[0, width] x [0, height]`.
    pub fn to_pixel(&self, point: GeoPoint) -> (f64, f64) {
        let x = (point.lon - self.extent.min_x) / self.lon_per_pixel();
        let y = (self.extent.max_y - point.lat) / self.lat_per_pixel();
        (x, y)
    }

    /// Geographic position of a continuous pixel position.
    pub fn to_geo(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            self.extent.max_y - y * self.lat_per_pixel(),
            self.extent.min_x + x * self.lon_per_pixel(),
        )
    }

    /// Geographic position of the centre of pixel (col, row).
    pub fn pixel_center(&self, col: u32, row: u32) -> GeoPoint {
        self.to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }
}
