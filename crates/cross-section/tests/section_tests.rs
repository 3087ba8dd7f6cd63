//! Cross-section tests on synthetic grids.

use case_common::{GeoPoint, LatLonGrid, LayeredField};
use cross_section::{cross_section, cross_section_with, CrossSectionError, InterpolationMethod};
use test_utils::{
    assert_approx_eq, case_latitudes, case_longitudes, create_axis, create_layered_moisture,
    create_linear_field,
};

fn transect() -> (GeoPoint, GeoPoint) {
    (GeoPoint::new(30.0, -66.0), GeoPoint::new(39.5, -75.3))
}

fn layered(lat: Vec<f64>, lon: Vec<f64>, layers: usize, values: Vec<f32>) -> LayeredField {
    let grid = LatLonGrid::from_coords(lat, lon).unwrap();
    let coords = create_axis(1.0, 1.0, layers);
    LayeredField::new("E_P_integrated_layers", None, grid, "layers", coords, values).unwrap()
}

// ============================================================================
// Path indices
// ============================================================================

#[test]
fn test_indices_between_endpoint_indices() {
    let lat = case_latitudes();
    let lon = case_longitudes();
    let values = create_layered_moisture(3, &lat, &lon);
    let field = layered(lat, lon, 3, values);
    let (start, end) = transect();

    let section = cross_section(&field, start, end, 100).unwrap();
    assert_eq!(section.steps(), 100);

    let (r0, c0) = field.grid.fractional_index(start).unwrap();
    let (r1, c1) = field.grid.fractional_index(end).unwrap();
    let (rmin, rmax) = (r0.min(r1), r0.max(r1));
    let (cmin, cmax) = (c0.min(c1), c0.max(c1));

    for index in &section.indices {
        let (r, c) = index.expect("transect lies inside the case grid");
        assert!(r >= rmin - 1e-9 && r <= rmax + 1e-9, "row {r} outside [{rmin}, {rmax}]");
        assert!(c >= cmin - 1e-9 && c <= cmax + 1e-9, "col {c} outside [{cmin}, {cmax}]");
    }
}

#[test]
fn test_descending_latitude_axis() {
    let mut lat = case_latitudes();
    lat.reverse();
    let lon = case_longitudes();
    let values = create_linear_field(&lat, &lon, 0.0, 1.0, 0.0);
    let field = layered(lat, lon, 1, values);
    let (start, end) = transect();

    let section = cross_section(&field, start, end, 20).unwrap();
    for (step, point) in section.points.iter().enumerate() {
        assert_approx_eq!(section.value(0, step), point.lat, 1e-3);
    }
}

// ============================================================================
// Interpolated values
// ============================================================================

#[test]
fn test_linear_field_is_reproduced() {
    let lat = create_axis(25.0, 0.5, 40);
    let lon = create_axis(-80.0, 0.5, 40);
    let (a, b, c) = (3.0, 0.2, -0.1);
    let mut values = create_linear_field(&lat, &lon, a, b, c);
    // Second layer doubles the first.
    values.extend(values.clone().iter().map(|v| v * 2.0));
    let field = layered(lat, lon, 2, values);
    let (start, end) = transect();

    let section = cross_section(&field, start, end, 100).unwrap();
    for (step, p) in section.points.iter().enumerate() {
        let expected = a + b * p.lat + c * p.lon;
        assert_approx_eq!(section.value(0, step), expected, 1e-3);
        assert_approx_eq!(section.value(1, step), 2.0 * expected, 2e-3);
    }
}

#[test]
fn test_points_outside_grid_are_nan() {
    let lat = create_axis(30.0, 1.0, 5); // 30..34, transect ends at 39.5
    let lon = create_axis(-80.0, 1.0, 20);
    let values = create_linear_field(&lat, &lon, 1.0, 0.0, 0.0);
    let field = layered(lat, lon, 1, values);
    let (start, end) = transect();

    let section = cross_section(&field, start, end, 50).unwrap();
    assert!(section.outside_count() > 0);
    assert!(section.value(0, 49).is_nan());
    assert_eq!(section.value(0, 0), 1.0);
    assert_eq!(section.nanmax(), Some(1.0));
}

#[test]
fn test_nearest_method_returns_grid_values() {
    let lat = create_axis(25.0, 1.0, 20);
    let lon = create_axis(-80.0, 1.0, 20);
    let values = create_linear_field(&lat, &lon, 0.0, 1.0, 0.0);
    let field = layered(lat, lon, 1, values);
    let (start, end) = transect();

    let section =
        cross_section_with(&field, start, end, 30, InterpolationMethod::Nearest).unwrap();
    for v in section.layer_values(0) {
        assert_eq!(v.fract(), 0.0, "nearest value {v} is not a grid latitude");
    }
}

#[test]
fn test_too_few_steps_is_path_error() {
    let lat = create_axis(25.0, 1.0, 5);
    let lon = create_axis(-80.0, 1.0, 5);
    let values = create_linear_field(&lat, &lon, 0.0, 0.0, 0.0);
    let field = layered(lat, lon, 1, values);
    let (start, end) = transect();

    let err = cross_section(&field, start, end, 1).unwrap_err();
    assert!(matches!(err, CrossSectionError::Path(_)));
}
