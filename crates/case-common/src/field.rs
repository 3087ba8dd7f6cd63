//! Gridded scalar fields on a lat/lon grid.

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};
use crate::grid::LatLonGrid;

/// A 2-D scalar field, row-major with rows along latitude.
///
/// Missing values are stored as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GriddedField {
    pub name: String,
    pub units: Option<String>,
    pub grid: LatLonGrid,
    pub values: Vec<f32>,
}

impl GriddedField {
    pub fn new(
        name: impl Into<String>,
        units: Option<String>,
        grid: LatLonGrid,
        values: Vec<f32>,
    ) -> CommonResult<Self> {
        grid.check_len(values.len())?;
        Ok(Self {
            name: name.into(),
            units,
            grid,
            values,
        })
    }

    /// Value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[self.grid.flat_index(row, col)]
    }

    /// Minimum and maximum of the non-NaN values.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        finite_range(&self.values)
    }
}

/// A 3-D field stored as `[layer][lat][lon]`, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredField {
    pub name: String,
    pub units: Option<String>,
    pub grid: LatLonGrid,
    /// Name of the vertical dimension (e.g. `layers`).
    pub layer_name: String,
    /// Coordinate values of the vertical dimension.
    pub layers: Vec<f64>,
    pub values: Vec<f32>,
}

impl LayeredField {
    pub fn new(
        name: impl Into<String>,
        units: Option<String>,
        grid: LatLonGrid,
        layer_name: impl Into<String>,
        layers: Vec<f64>,
        values: Vec<f32>,
    ) -> CommonResult<Self> {
        let expected = layers.len() * grid.len();
        if expected != values.len() {
            return Err(CommonError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            units,
            grid,
            layer_name: layer_name.into(),
            layers,
            values,
        })
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Borrow one horizontal slice.
    pub fn layer(&self, index: usize) -> &[f32] {
        let n = self.grid.len();
        &self.values[index * n..(index + 1) * n]
    }

    pub fn value_range(&self) -> Option<(f32, f32)> {
        finite_range(&self.values)
    }
}

fn finite_range(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
