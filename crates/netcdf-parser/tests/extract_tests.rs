//! Integration tests for sub-dataset extraction.

use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use netcdf_parser::{array_for_transversal, list_variables, NetCdfError, LAYERS_VAR};
use test_utils::{create_layered_moisture, CaseStep, FILL_VALUE};

fn write_step(dir: &std::path::Path, step: &CaseStep) -> std::path::PathBuf {
    let path = dir.join("step.nc");
    step.write(&path).unwrap();
    path
}

// ============================================================================
// Variable selection
// ============================================================================

#[test]
fn test_extracts_variable_and_coordinates_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_step(dir.path(), &CaseStep::small());
    let output = dir.path().join("cross_file.nc");

    let summary = array_for_transversal(&input, &output, LAYERS_VAR).unwrap();
    assert_eq!(summary.variable, LAYERS_VAR);

    let mut names = list_variables(&output).unwrap();
    names.sort();
    assert_eq!(names, vec!["E_P_integrated_layers", "lat", "layers", "lon"]);

    let mut coords = summary.coordinates.clone();
    coords.sort();
    assert_eq!(coords, vec!["lat", "layers", "lon"]);
}

#[test]
fn test_singleton_time_coordinate_is_copied() {
    let dir = tempfile::tempdir().unwrap();
    let step = CaseStep {
        with_time: true,
        ..CaseStep::small()
    };
    let input = write_step(dir.path(), &step);
    let output = dir.path().join("cross_file.nc");

    let summary = array_for_transversal(&input, &output, LAYERS_VAR).unwrap();
    assert!(summary.coordinates.contains(&"time".to_string()));
    assert!(summary.dimensions.contains(&("time".to_string(), 1)));
}

#[test]
fn test_missing_variable_is_lookup_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_step(dir.path(), &CaseStep::small());
    let output = dir.path().join("cross_file.nc");

    let err = array_for_transversal(&input, &output, "E_P_missing").unwrap_err();
    match err {
        NetCdfError::MissingData(msg) => {
            assert!(msg.contains("E_P_missing"));
            assert!(msg.contains("E_P_integrated"));
        }
        other => panic!("expected MissingData, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = array_for_transversal(
        dir.path().join("absent.nc"),
        dir.path().join("out.nc"),
        LAYERS_VAR,
    )
    .unwrap_err();
    assert!(matches!(err, NetCdfError::IoError(_)));
}

/// A step with an `i32` layer axis, a scalar `time` and 2-D `XLAT`/`XLONG`
/// referenced through the variable's `coordinates` attribute.
fn write_wrf_style_step(path: &std::path::Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("layers", 2).unwrap();
    file.add_dimension("south_north", 2).unwrap();
    file.add_dimension("west_east", 3).unwrap();

    let mut time = file.add_variable::<f64>("time", &[]).unwrap();
    time.put_attribute("units", "hours since 2002-02-08 12:00:00").unwrap();
    time.put_values(&[6.0], ..).unwrap();

    let mut layers = file.add_variable::<i32>("layers", &["layers"]).unwrap();
    layers.put_values(&[850i32, 500], ..).unwrap();

    let dims = ["south_north", "west_east"];
    let mut xlat = file.add_variable::<f32>("XLAT", &dims).unwrap();
    xlat.put_values(&[30.0f32, 30.0, 30.0, 31.0, 31.0, 31.0], ..).unwrap();
    let mut xlong = file.add_variable::<f32>("XLONG", &dims).unwrap();
    xlong.put_values(&[-70.0f32, -69.0, -68.0, -70.0, -69.0, -68.0], ..).unwrap();

    let mut var = file
        .add_variable::<i16>(LAYERS_VAR, &["layers", "south_north", "west_east"])
        .unwrap();
    var.put_attribute("_FillValue", -1i16).unwrap();
    var.put_attribute("scale_factor", 0.01f32).unwrap();
    var.put_attribute("coordinates", "time XLAT XLONG").unwrap();
    var.put_values(&[1i16, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12], ..).unwrap();

    let mut other = file.add_variable::<f32>("T2", &dims).unwrap();
    other.put_values(&[280.0f32; 6], ..).unwrap();
}

#[test]
fn test_auxiliary_coordinates_are_copied() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    write_wrf_style_step(&input);
    let output = dir.path().join("cross_file.nc");

    let summary = array_for_transversal(&input, &output, LAYERS_VAR).unwrap();
    let mut coords = summary.coordinates.clone();
    coords.sort();
    assert_eq!(coords, vec!["XLAT", "XLONG", "layers", "time"]);

    let mut names = list_variables(&output).unwrap();
    names.sort();
    assert_eq!(names, vec!["E_P_integrated_layers", "XLAT", "XLONG", "layers", "time"]);

    let file = netcdf::open(&output).unwrap();
    let time = file.variable("time").unwrap();
    assert!(time.dimensions().is_empty());
    assert_eq!(time.get_values::<f64, _>(..).unwrap(), vec![6.0]);
    assert_eq!(
        file.variable(LAYERS_VAR)
            .unwrap()
            .attribute_value("coordinates")
            .unwrap()
            .unwrap(),
        AttributeValue::Str("time XLAT XLONG".into())
    );
}

#[test]
fn test_copied_variables_keep_storage_type() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    write_wrf_style_step(&input);
    let output = dir.path().join("cross_file.nc");
    array_for_transversal(&input, &output, LAYERS_VAR).unwrap();

    let file = netcdf::open(&output).unwrap();

    let layers = file.variable("layers").unwrap();
    assert!(matches!(layers.vartype(), NcVariableType::Int(IntType::I32)));
    assert_eq!(layers.get_values::<i32, _>(..).unwrap(), vec![850, 500]);

    let xlat = file.variable("XLAT").unwrap();
    assert!(matches!(xlat.vartype(), NcVariableType::Float(FloatType::F32)));

    let var = file.variable(LAYERS_VAR).unwrap();
    assert!(matches!(var.vartype(), NcVariableType::Int(IntType::I16)));
    assert_eq!(
        var.get_values::<i16, _>(..).unwrap(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
    );
    assert_eq!(
        var.attribute_value("_FillValue").unwrap().unwrap(),
        AttributeValue::Short(-1)
    );
}

// ============================================================================
// Values and attributes
// ============================================================================

#[test]
fn test_values_and_attributes_survive() {
    let dir = tempfile::tempdir().unwrap();
    let step = CaseStep::small();
    let input = write_step(dir.path(), &step);
    let output = dir.path().join("cross_file.nc");
    array_for_transversal(&input, &output, LAYERS_VAR).unwrap();

    let file = netcdf::open(&output).unwrap();

    let title = file.attribute("title").unwrap().value().unwrap();
    assert_eq!(title, AttributeValue::Str("Synthetic moisture uptake case".into()));

    let lat = file.variable("lat").unwrap();
    assert_eq!(lat.get_values::<f64, _>(..).unwrap(), step.lat);
    assert_eq!(
        lat.attribute_value("units").unwrap().unwrap(),
        AttributeValue::Str("degrees_north".into())
    );

    let var = file.variable(LAYERS_VAR).unwrap();
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    assert_eq!(dims, vec!["layers", "lat", "lon"]);
    assert_eq!(
        var.attribute_value("units").unwrap().unwrap(),
        AttributeValue::Str("mm/day".into())
    );
    let fill = f64::try_from(var.attribute_value("_FillValue").unwrap().unwrap()).unwrap();
    assert_eq!(fill, FILL_VALUE as f64);

    let expected = create_layered_moisture(step.layers.len(), &step.lat, &step.lon);
    let actual = var.get_values::<f64, _>(..).unwrap();
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(&expected) {
        assert!((a - *e as f64).abs() < 1e-6);
    }
}

#[test]
fn test_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_step(dir.path(), &CaseStep::small());
    let output = dir.path().join("cross_file.nc");
    std::fs::write(&output, b"stale").unwrap();

    array_for_transversal(&input, &output, LAYERS_VAR).unwrap();
    assert!(list_variables(&output).unwrap().contains(&LAYERS_VAR.to_string()));
}
