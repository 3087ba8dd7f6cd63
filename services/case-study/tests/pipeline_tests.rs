//! Full case runs on a synthetic archive.

use std::path::Path;

use case_study::{run_case, CaseConfig};
use renderer::PlotStyle;
use test_utils::{
    temp_test_dir, write_case_archive, write_mask_file, write_track_file, write_zip_archive,
    CaseStep, CASE_STEP_NAMES, GENESIS_STEP, MASK_VARIABLE,
};

/// Configuration pointing at `dir` with a low-resolution style.
fn test_config(dir: &Path, archive: &Path) -> CaseConfig {
    CaseConfig {
        archive: archive.to_path_buf(),
        extract_dir: dir.join("case_0292002"),
        output_dir: dir.join("out"),
        style: PlotStyle {
            dpi: 20.0,
            ..PlotStyle::default()
        },
        ..CaseConfig::default()
    }
}

#[test]
fn test_run_case_produces_all_outputs() {
    let dir = temp_test_dir();
    let archive = write_case_archive(dir.path(), &CaseStep::default());
    let mut config = test_config(dir.path(), &archive);
    config.track_file = Some(write_track_file(&dir.path().join("track_029.dat")));
    let mask_path = dir.path().join("radius_029.nc");
    let inside = write_mask_file(&mask_path, 9, 11, 3.0);
    config.mask_file = Some(mask_path);
    config.mask_variable = MASK_VARIABLE.to_string();

    let outputs = run_case(&config).unwrap();

    let mut expected: Vec<String> = CASE_STEP_NAMES.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(outputs.steps, expected);
    assert_eq!(outputs.genesis.file_name().unwrap(), GENESIS_STEP);
    assert_eq!(outputs.track_records, Some(4));
    assert_eq!(outputs.masked_cells, Some(inside));

    let variables = netcdf_parser::list_variables(&outputs.cross_file).unwrap();
    assert!(variables.contains(&"E_P_integrated_layers".to_string()));
    assert!(!variables.contains(&"E_P_integrated".to_string()));

    for (path, name) in [
        (&outputs.map, "Integrated_Moisture_Up_Genesis.png"),
        (&outputs.section, "cross_Genesis.png"),
    ] {
        assert_eq!(path.file_name().unwrap(), name);
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), config.style.pixel_size());
    }
}

#[test]
fn test_run_case_twice_overwrites() {
    let dir = temp_test_dir();
    let archive = write_case_archive(dir.path(), &CaseStep::small());
    let config = test_config(dir.path(), &archive);

    let first = run_case(&config).unwrap();
    let map_pixels = image::open(&first.map).unwrap().to_rgba8();
    let second = run_case(&config).unwrap();

    assert_eq!(first, second);
    assert_eq!(image::open(&second.map).unwrap().to_rgba8(), map_pixels);
}

#[test]
fn test_empty_archive_fails() {
    let dir = temp_test_dir();
    let archive = write_zip_archive(&dir.path().join("radius.zip"), &[]);
    let config = test_config(dir.path(), &archive);

    let err = run_case(&config).unwrap_err();
    assert!(format!("{err:#}").contains("No case files"), "{err:#}");
}

#[test]
fn test_missing_variable_fails() {
    let dir = temp_test_dir();
    let archive = write_case_archive(dir.path(), &CaseStep::small());
    let mut config = test_config(dir.path(), &archive);
    config.variables.layers = "E_P_layers".to_string();

    let err = run_case(&config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("E_P_layers"), "{message}");
    assert!(!config.map_path().exists());
}
