//! Synthetic case files.
//!
//! Writes small but structurally faithful versions of the inputs a case run
//! consumes: NetCDF time steps with `lat`/`lon`/`layers` coordinates and the
//! moisture-uptake variables, the zip archive that bundles them, the storm
//! track text file and the WRF-style storm mask.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::generators::{
    case_latitudes, case_longitudes, create_axis, create_layered_moisture, create_moisture_grid,
};

/// Fill value used for the synthetic moisture variables.
pub const FILL_VALUE: f32 = -9999.0;

/// Time steps of the synthetic case, deliberately not in sorted order.
pub const CASE_STEP_NAMES: [&str; 3] = ["2002020818.nc", "2002020812.nc", "2002020900.nc"];

/// Name of the lexicographically first (genesis) step.
pub const GENESIS_STEP: &str = "2002020812.nc";

/// Mask variable name of the synthetic case.
pub const MASK_VARIABLE: &str = "2002020812";

/// Shape and options of one synthetic time step.
#[derive(Debug, Clone)]
pub struct CaseStep {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub layers: Vec<f64>,
    /// Prepend a singleton `time` dimension to the moisture variables.
    pub with_time: bool,
}

impl Default for CaseStep {
    fn default() -> Self {
        Self {
            lat: case_latitudes(),
            lon: case_longitudes(),
            layers: create_axis(1.0, 1.0, 10),
            with_time: false,
        }
    }
}

impl CaseStep {
    /// A small grid around the synthetic blob, for fast tests.
    pub fn small() -> Self {
        Self {
            lat: create_axis(28.0, 1.0, 14),
            lon: create_axis(-78.0, 1.0, 14),
            layers: create_axis(1.0, 1.0, 4),
            with_time: false,
        }
    }

    /// Write this step as a NetCDF file.
    ///
    /// Variables: `lat`, `lon`, `layers` (and `time` if requested) coordinate
    /// variables, `E_P_integrated(lat, lon)`,
    /// `E_P_integrated_layers(layers, lat, lon)` and a non-coordinate
    /// `cell_area(lat, lon)` that extraction must leave behind.
    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;
        file.add_attribute("title", "Synthetic moisture uptake case")?;
        file.add_attribute("case", "029")?;

        if self.with_time {
            file.add_dimension("time", 1)?;
        }
        file.add_dimension("layers", self.layers.len())?;
        file.add_dimension("lat", self.lat.len())?;
        file.add_dimension("lon", self.lon.len())?;

        if self.with_time {
            let mut time = file.add_variable::<f64>("time", &["time"])?;
            time.put_attribute("units", "hours since 2002-02-08 12:00:00")?;
            time.put_values(&[0.0], ..)?;
        }

        let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
        lat.put_attribute("units", "degrees_north")?;
        lat.put_attribute("long_name", "latitude")?;
        lat.put_values(&self.lat, ..)?;

        let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
        lon.put_attribute("units", "degrees_east")?;
        lon.put_attribute("long_name", "longitude")?;
        lon.put_values(&self.lon, ..)?;

        let mut layers = file.add_variable::<f64>("layers", &["layers"])?;
        layers.put_attribute("long_name", "vertical layer")?;
        layers.put_values(&self.layers, ..)?;

        let (dims_2d, dims_3d): (Vec<&str>, Vec<&str>) = if self.with_time {
            (vec!["time", "lat", "lon"], vec!["time", "layers", "lat", "lon"])
        } else {
            (vec!["lat", "lon"], vec!["layers", "lat", "lon"])
        };

        let integrated = create_moisture_grid(&self.lat, &self.lon);
        let mut var = file.add_variable::<f32>("E_P_integrated", &dims_2d)?;
        var.put_attribute("_FillValue", FILL_VALUE)?;
        var.put_attribute("units", "mm/day")?;
        var.put_attribute("long_name", "integrated moisture uptake")?;
        var.put_values(&integrated, ..)?;

        let layered = create_layered_moisture(self.layers.len(), &self.lat, &self.lon);
        let mut var = file.add_variable::<f32>("E_P_integrated_layers", &dims_3d)?;
        var.put_attribute("_FillValue", FILL_VALUE)?;
        var.put_attribute("units", "mm/day")?;
        var.put_attribute("long_name", "moisture uptake per layer")?;
        var.put_values(&layered, ..)?;

        let area = vec![1.0f32; self.lat.len() * self.lon.len()];
        let mut var = file.add_variable::<f32>("cell_area", &["lat", "lon"])?;
        var.put_attribute("units", "km2")?;
        var.put_values(&area, ..)?;

        Ok(())
    }
}

/// Write every step of the synthetic case into `dir`, returning their paths
/// in [`CASE_STEP_NAMES`] order.
pub fn write_case_steps(dir: &Path, step: &CaseStep) -> Vec<PathBuf> {
    CASE_STEP_NAMES
        .iter()
        .map(|name| {
            let path = dir.join(name);
            step.write(&path)
                .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
            path
        })
        .collect()
}

/// Bundle files into a zip archive, storing each under its file name.
pub fn write_zip_archive(archive: &Path, files: &[PathBuf]) -> PathBuf {
    let out = File::create(archive).expect("Failed to create archive");
    let mut writer = zip::ZipWriter::new(out);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("archive member needs a UTF-8 file name");
        let bytes = std::fs::read(path).expect("Failed to read archive member");
        writer
            .start_file(name, options)
            .expect("Failed to start archive entry");
        writer
            .write_all(&bytes)
            .expect("Failed to write archive entry");
    }
    writer.finish().expect("Failed to finish archive");
    archive.to_path_buf()
}

/// Write the synthetic case as `radius.zip` inside `dir`.
///
/// The NetCDF steps are staged in a `staging/` subdirectory first.
pub fn write_case_archive(dir: &Path, step: &CaseStep) -> PathBuf {
    let staging = dir.join("staging");
    std::fs::create_dir_all(&staging).expect("Failed to create staging directory");
    let files = write_case_steps(&staging, step);
    write_zip_archive(&dir.join("radius.zip"), &files)
}

/// Storm track in the case's text format: a header carrying area, case id
/// and year, then `date, hour, lat, lon, mslp, lci, radius` per line.
pub const TRACK_FILE_CONTENTS: &str = "\
NATL0292002 extratropical case
20020208, 12,30.0,-66.0,1004.5,1008.0,350.0
20020208, 18,32.4,-68.5,998.2,1004.0,420.0
20020209, 00,35.1,-71.0,991.7,1000.0,510.0
20020209, 06,39.5,-75.3,987.3,996.0,600.0
";

/// Write [`TRACK_FILE_CONTENTS`] to `path`.
pub fn write_track_file(path: &Path) -> PathBuf {
    std::fs::write(path, TRACK_FILE_CONTENTS).expect("Failed to write track file");
    path.to_path_buf()
}

/// Write a WRF-style storm mask: `XLAT`/`XLONG(Time, south_north, west_east)`
/// and a `2002020812(south_north, west_east)` variable holding 1 within
/// `radius_cells` of the grid centre and 0 elsewhere.
pub fn write_mask_file(path: &Path, rows: usize, cols: usize, radius_cells: f64) -> usize {
    let mut file = netcdf::create(path).expect("Failed to create mask file");
    file.add_dimension("Time", 1).expect("dimension");
    file.add_dimension("south_north", rows).expect("dimension");
    file.add_dimension("west_east", cols).expect("dimension");

    let mut lat = Vec::with_capacity(rows * cols);
    let mut lon = Vec::with_capacity(rows * cols);
    let mut mask = Vec::with_capacity(rows * cols);
    let (cr, cc) = ((rows as f64 - 1.0) / 2.0, (cols as f64 - 1.0) / 2.0);
    for r in 0..rows {
        for c in 0..cols {
            lat.push(25.0 + r as f32 * 0.5);
            lon.push(-80.0 + c as f32 * 0.5);
            let d = ((r as f64 - cr).powi(2) + (c as f64 - cc).powi(2)).sqrt();
            mask.push(if d <= radius_cells { 1.0f32 } else { 0.0 });
        }
    }
    let inside = mask.iter().filter(|&&v| v == 1.0).count();

    let dims = ["Time", "south_north", "west_east"];
    let mut var = file.add_variable::<f32>("XLAT", &dims).expect("XLAT");
    var.put_values(&lat, ..).expect("XLAT values");
    let mut var = file.add_variable::<f32>("XLONG", &dims).expect("XLONG");
    var.put_values(&lon, ..).expect("XLONG values");
    let mut var = file
        .add_variable::<f32>(MASK_VARIABLE, &["south_north", "west_east"])
        .expect("mask");
    var.put_values(&mask, ..).expect("mask values");

    inside
}
