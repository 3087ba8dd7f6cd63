//! Rectilinear latitude/longitude grids.
//!
//! Model output stores its horizontal coordinates as two 1-D axes; the
//! regular grid is their outer product. Axes may run in either direction
//! and need not be evenly spaced, so lookups go through a binary search
//! rather than a fixed `first + i * step` formula.

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};
use crate::{BoundingBox, GeoPoint};

/// A 1-D, strictly monotonic coordinate axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    name: String,
    values: Vec<f64>,
    ascending: bool,
}

impl Axis {
    /// Create an axis, validating that it is non-empty and strictly monotonic.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> CommonResult<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(CommonError::EmptyAxis(name));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CommonError::InvalidCoordinate(format!(
                "axis '{name}' contains non-finite values"
            )));
        }

        let ascending = values.len() < 2 || values[1] > values[0];
        let monotonic = values.windows(2).all(|w| {
            if ascending {
                w[1] > w[0]
            } else {
                w[1] < w[0]
            }
        });
        if !monotonic {
            return Err(CommonError::NonMonotonicAxis(name));
        }

        Ok(Self {
            name,
            values,
            ascending,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Smallest and largest coordinate on the axis.
    pub fn range(&self) -> (f64, f64) {
        let first = self.values[0];
        let last = self.values[self.values.len() - 1];
        (first.min(last), first.max(last))
    }

    /// Fractional index of `coord` on this axis.
    ///
    /// Returns `None` when `coord` lies outside the axis range. The integer
    /// part is the lower bracketing index, the fraction the linear weight
    /// toward the next one.
    pub fn fractional_index(&self, coord: f64) -> Option<f64> {
        if !coord.is_finite() {
            return None;
        }
        let (lo, hi) = self.range();
        if coord < lo || coord > hi {
            return None;
        }
        if self.values.len() == 1 {
            return Some(0.0);
        }

        // Number of axis values "before" coord in axis order.
        let before = if self.ascending {
            self.values.partition_point(|&v| v <= coord)
        } else {
            self.values.partition_point(|&v| v >= coord)
        };
        let i0 = before.saturating_sub(1).min(self.values.len() - 2);
        let v0 = self.values[i0];
        let v1 = self.values[i0 + 1];
        let t = (coord - v0) / (v1 - v0);

        Some(i0 as f64 + t.clamp(0.0, 1.0))
    }
}

/// Horizontal grid made of a latitude axis (rows) and a longitude axis (columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLonGrid {
    pub lat: Axis,
    pub lon: Axis,
}

impl LatLonGrid {
    pub fn new(lat: Axis, lon: Axis) -> Self {
        Self { lat, lon }
    }

    /// Build from raw coordinate vectors.
    pub fn from_coords(lat: Vec<f64>, lon: Vec<f64>) -> CommonResult<Self> {
        Ok(Self {
            lat: Axis::new("lat", lat)?,
            lon: Axis::new("lon", lon)?,
        })
    }

    /// Grid shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.lat.len() * self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of (row, col).
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.lon.len() + col
    }

    /// Geographic bounds covered by the grid.
    pub fn bbox(&self) -> BoundingBox {
        let (min_lat, max_lat) = self.lat.range();
        let (min_lon, max_lon) = self.lon.range();
        BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Fractional (row, col) of a point, or `None` outside the grid.
    pub fn fractional_index(&self, point: GeoPoint) -> Option<(f64, f64)> {
        let row = self.lat.fractional_index(point.lat)?;
        let col = self.lon.fractional_index(point.lon)?;
        Some((row, col))
    }

    /// Ensure a flat data buffer matches the grid shape.
    pub fn check_len(&self, actual: usize) -> CommonResult<()> {
        let expected = self.len();
        if expected != actual {
            return Err(CommonError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rejects_non_monotonic() {
        assert!(Axis::new("lat", vec![0.0, 1.0, 1.0]).is_err());
        assert!(Axis::new("lat", vec![0.0, 2.0, 1.0]).is_err());
        assert!(Axis::new("lat", vec![]).is_err());
    }

    #[test]
    fn test_fractional_index_ascending() {
        let axis = Axis::new("lon", vec![-80.0, -70.0, -60.0]).unwrap();
        assert_eq!(axis.fractional_index(-80.0), Some(0.0));
        assert_eq!(axis.fractional_index(-75.0), Some(0.5));
        assert_eq!(axis.fractional_index(-60.0), Some(2.0));
        assert_eq!(axis.fractional_index(-59.0), None);
    }

    #[test]
    fn test_fractional_index_descending() {
        let axis = Axis::new("lat", vec![45.0, 40.0, 30.0]).unwrap();
        assert!(!axis.is_ascending());
        assert_eq!(axis.fractional_index(45.0), Some(0.0));
        assert_eq!(axis.fractional_index(42.5), Some(0.5));
        assert_eq!(axis.fractional_index(35.0), Some(1.5));
        assert_eq!(axis.fractional_index(30.0), Some(2.0));
    }

    #[test]
    fn test_grid_bbox_and_index() {
        let grid = LatLonGrid::from_coords(vec![10.0, 20.0], vec![0.0, 5.0, 10.0]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.flat_index(1, 2), 5);
        assert_eq!(grid.bbox(), BoundingBox::new(0.0, 10.0, 10.0, 20.0));
        assert_eq!(
            grid.fractional_index(GeoPoint::new(15.0, 2.5)),
            Some((0.5, 0.5))
        );
        assert!(grid.check_len(6).is_ok());
        assert!(grid.check_len(5).is_err());
    }
}
