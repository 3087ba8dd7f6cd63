//! Cross-section sampling along a great-circle path.

use case_common::{GeoPoint, LayeredField};
use projection::geodesic_path;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CrossSectionError, CrossSectionResult};
use crate::interpolation::InterpolationMethod;

/// Number of path points when none is configured.
pub const DEFAULT_STEPS: usize = 100;

/// A layered field sampled along a path.
///
/// `values` is `[layer][step]`, row-major. Points off the grid hold NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossSection {
    pub variable: String,
    pub units: Option<String>,
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Path points, start and end included.
    pub points: Vec<GeoPoint>,
    /// Fractional (row, col) of each point, `None` outside the grid.
    pub indices: Vec<Option<(f64, f64)>>,
    pub layer_name: String,
    pub layers: Vec<f64>,
    pub values: Vec<f32>,
}

impl CrossSection {
    pub fn steps(&self) -> usize {
        self.points.len()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Value of `layer` at path step `step`.
    pub fn value(&self, layer: usize, step: usize) -> f32 {
        self.values[layer * self.steps() + step]
    }

    /// All steps of one layer.
    pub fn layer_values(&self, layer: usize) -> &[f32] {
        let n = self.steps();
        &self.values[layer * n..(layer + 1) * n]
    }

    pub fn latitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.lat).collect()
    }

    pub fn longitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.lon).collect()
    }

    /// True when the path runs along a meridian, so longitude cannot serve
    /// as its horizontal coordinate.
    pub fn is_meridional(&self) -> bool {
        (self.end.lon - self.start.lon).abs() < 1e-9
    }

    /// Horizontal coordinate of the path for plotting: longitude, or
    /// latitude for a meridional path.
    pub fn horizontal_axis(&self) -> (&'static str, Vec<f64>) {
        if self.is_meridional() {
            ("Latitude", self.latitudes())
        } else {
            ("Longitude", self.longitudes())
        }
    }

    /// Largest non-NaN value, like numpy's `nanmax`. `None` when every
    /// value is NaN.
    pub fn nanmax(&self) -> Option<f32> {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
    }

    /// Number of path points outside the field's grid.
    pub fn outside_count(&self) -> usize {
        self.indices.iter().filter(|i| i.is_none()).count()
    }
}

/// Bilinear cross-section of `field` from `start` to `end` with `steps` points.
pub fn cross_section(
    field: &LayeredField,
    start: GeoPoint,
    end: GeoPoint,
    steps: usize,
) -> CrossSectionResult<CrossSection> {
    cross_section_with(field, start, end, steps, InterpolationMethod::Bilinear)
}

/// Cross-section with an explicit interpolation method.
pub fn cross_section_with(
    field: &LayeredField,
    start: GeoPoint,
    end: GeoPoint,
    steps: usize,
    method: InterpolationMethod,
) -> CrossSectionResult<CrossSection> {
    if field.num_layers() == 0 || field.grid.is_empty() {
        return Err(CrossSectionError::EmptyField(field.name.clone()));
    }

    let points = geodesic_path(start, end, steps)?;
    let indices: Vec<Option<(f64, f64)>> = points
        .iter()
        .map(|&p| field.grid.fractional_index(p))
        .collect();

    let (rows, cols) = field.grid.shape();
    let mut values = Vec::with_capacity(field.num_layers() * points.len());
    for layer in 0..field.num_layers() {
        let data = field.layer(layer);
        values.extend(indices.iter().map(|index| match index {
            Some((row, col)) => method.interpolate(data, cols, rows, *col, *row),
            None => f32::NAN,
        }));
    }

    let section = CrossSection {
        variable: field.name.clone(),
        units: field.units.clone(),
        start,
        end,
        points,
        indices,
        layer_name: field.layer_name.clone(),
        layers: field.layers.clone(),
        values,
    };

    let outside = section.outside_count();
    if outside > 0 {
        warn!(
            variable = %section.variable,
            outside = outside,
            steps = steps,
            "Cross-section path leaves the grid; those points are NaN"
        );
    }
    debug!(
        variable = %section.variable,
        max = ?section.nanmax(),
        method = ?method,
        "Cross-section values"
    );
    info!(
        variable = %section.variable,
        start = ?(start.lat, start.lon),
        end = ?(end.lat, end.lon),
        steps = steps,
        layers = section.num_layers(),
        "Computed cross-section"
    );

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_common::LatLonGrid;

    fn field(values: Vec<f32>) -> LayeredField {
        let grid = LatLonGrid::from_coords(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        LayeredField::new("v", None, grid, "layers", vec![1.0, 2.0], values).unwrap()
    }

    #[test]
    fn test_layer_slicing() {
        let f = field(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        let s = cross_section(&f, GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0), 5).unwrap();
        assert_eq!(s.layer_values(0), &[0.0; 5]);
        assert_eq!(s.layer_values(1), &[1.0; 5]);
        assert_eq!(s.value(1, 4), 1.0);
        assert_eq!(s.nanmax(), Some(1.0));
    }

    #[test]
    fn test_meridional_axis_is_latitude() {
        let f = field(vec![0.0; 8]);
        let s = cross_section(&f, GeoPoint::new(0.0, 0.5), GeoPoint::new(1.0, 0.5), 3).unwrap();
        let (label, values) = s.horizontal_axis();
        assert_eq!(label, "Latitude");
        assert_eq!(values.first(), Some(&0.0));
        assert_eq!(values.last(), Some(&1.0));
    }

    #[test]
    fn test_nanmax_all_nan() {
        let f = field(vec![f32::NAN; 8]);
        let s = cross_section(&f, GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0), 3).unwrap();
        assert_eq!(s.nanmax(), None);
    }
}
