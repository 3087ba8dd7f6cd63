//! Point sampling of gridded data.
//!
//! Positions are fractional (column, row) indices into a row-major grid, as
//! produced by [`case_common::LatLonGrid::fractional_index`].

use case_common::{GeoPoint, GriddedField};
use serde::{Deserialize, Serialize};

/// How values between grid points are estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Value of the nearest grid point.
    Nearest,
    /// Weighted mean of the four surrounding grid points.
    #[default]
    Bilinear,
}

impl InterpolationMethod {
    pub fn interpolate(self, data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
        match self {
            Self::Nearest => nearest_interpolate(data, width, height, x, y),
            Self::Bilinear => bilinear_interpolate(data, width, height, x, y),
        }
    }
}

fn in_bounds(width: usize, height: usize, x: f64, y: f64) -> bool {
    x.is_finite()
        && y.is_finite()
        && x >= 0.0
        && y >= 0.0
        && x <= (width - 1) as f64
        && y <= (height - 1) as f64
}

/// Nearest neighbor interpolation.
///
/// Returns the value of the nearest grid point, or NaN off the grid.
pub fn nearest_interpolate(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    if width == 0 || height == 0 || !in_bounds(width, height, x, y) {
        return f32::NAN;
    }
    let col = x.round() as usize;
    let row = y.round() as usize;
    data[row * width + col]
}

/// Bilinear interpolation.
///
/// Smoothly interpolates between the four nearest grid points. NaN off the
/// grid or when any of the four corners is NaN.
pub fn bilinear_interpolate(data: &[f32], width: usize, height: usize, x: f64, y: f64) -> f32 {
    if width == 0 || height == 0 || !in_bounds(width, height, x, y) {
        return f32::NAN;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;

    let v00 = data[y0 * width + x0] as f64;
    let v10 = data[y0 * width + x1] as f64;
    let v01 = data[y1 * width + x0] as f64;
    let v11 = data[y1 * width + x1] as f64;

    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return f32::NAN;
    }

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    (top * (1.0 - yf) + bottom * yf) as f32
}

/// Sample a gridded field at a geographic point; NaN outside the grid.
pub fn sample_field(field: &GriddedField, point: GeoPoint, method: InterpolationMethod) -> f32 {
    let (rows, cols) = field.grid.shape();
    match field.grid.fractional_index(point) {
        Some((row, col)) => method.interpolate(&field.values, cols, rows, col, row),
        None => f32::NAN,
    }
}
