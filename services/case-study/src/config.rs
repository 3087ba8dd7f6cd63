//! Case study configuration.

use anyhow::{Context, Result};
use case_common::GeoPoint;
use cross_section::{InterpolationMethod, DEFAULT_STEPS};
use netcdf_parser::{INTEGRATED_VAR, LAT_VAR, LAYERS_VAR, LON_VAR};
use renderer::{MapOptions, PlotStyle, SectionOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration of one case run.
///
/// Every field has a default reproducing case 029 of 2002, so an empty
/// YAML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    /// Zip archive with one NetCDF file per time step.
    pub archive: PathBuf,
    /// Directory the archive is extracted into.
    pub extract_dir: PathBuf,
    /// Directory receiving the intermediate NetCDF file and the plots.
    pub output_dir: PathBuf,

    pub cross_file: String,
    pub map_file: String,
    pub section_file: String,

    pub variables: VariableNames,
    pub transect: TransectConfig,
    pub map: MapOptions,
    pub section: SectionOptions,
    pub style: PlotStyle,

    /// Storm track, read and logged when set.
    pub track_file: Option<PathBuf>,
    /// Storm-radius mask, read and logged when set.
    pub mask_file: Option<PathBuf>,
    pub mask_variable: String,
}

/// Names of the variables read from each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    pub lat: String,
    pub lon: String,
    pub integrated: String,
    pub layers: String,
}

/// The line along which the cross-section is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransectConfig {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub steps: usize,
    pub interpolation: InterpolationMethod,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from(
                "/mnt/lustre/hsm/nlsas/notape/home/uvi/fi/tramo/patricia/PAPER_II/REPO/EC/2002/02_prev_winter/029/radius.zip",
            ),
            extract_dir: PathBuf::from("./case_0292002/"),
            output_dir: PathBuf::from("."),
            cross_file: "cross_file.nc".to_string(),
            map_file: "Integrated_Moisture_Up_Genesis.png".to_string(),
            section_file: "cross_Genesis.png".to_string(),
            variables: VariableNames::default(),
            transect: TransectConfig::default(),
            map: MapOptions::default(),
            section: SectionOptions::default(),
            style: PlotStyle::default(),
            track_file: None,
            mask_file: None,
            mask_variable: "2002020812".to_string(),
        }
    }
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            lat: LAT_VAR.to_string(),
            lon: LON_VAR.to_string(),
            integrated: INTEGRATED_VAR.to_string(),
            layers: LAYERS_VAR.to_string(),
        }
    }
}

impl Default for TransectConfig {
    fn default() -> Self {
        Self {
            start: GeoPoint::new(30.0, -66.0),
            end: GeoPoint::new(39.5, -75.3),
            steps: DEFAULT_STEPS,
            interpolation: InterpolationMethod::Bilinear,
        }
    }
}

impl CaseConfig {
    pub fn cross_file_path(&self) -> PathBuf {
        self.output_dir.join(&self.cross_file)
    }

    pub fn map_path(&self) -> PathBuf {
        self.output_dir.join(&self.map_file)
    }

    pub fn section_path(&self) -> PathBuf {
        self.output_dir.join(&self.section_file)
    }

    /// Apply `CASE_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CASE_ARCHIVE") {
            self.archive = PathBuf::from(v);
        }
        if let Some(v) = lookup("CASE_EXTRACT_DIR") {
            self.extract_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CASE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CASE_DPI") {
            self.style.dpi = v
                .trim()
                .parse()
                .with_context(|| format!("CASE_DPI is not a number: {v}"))?;
        }
        Ok(())
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.transect.steps >= 2,
            "transect.steps must be at least 2, got {}",
            self.transect.steps
        );
        anyhow::ensure!(
            self.style.dpi > 0.0,
            "style.dpi must be positive, got {}",
            self.style.dpi
        );
        anyhow::ensure!(
            self.style.figsize.iter().all(|&s| s > 0.0),
            "style.figsize must be positive, got {:?}",
            self.style.figsize
        );
        anyhow::ensure!(
            self.section.level_interval > 0.0,
            "section.level_interval must be positive, got {}",
            self.section.level_interval
        );
        anyhow::ensure!(
            !self.section.pressure_labels.is_empty(),
            "section.pressure_labels cannot be empty"
        );
        for (name, file) in [
            ("cross_file", &self.cross_file),
            ("map_file", &self.map_file),
            ("section_file", &self.section_file),
        ] {
            anyhow::ensure!(!file.is_empty(), "{name} cannot be empty");
        }
        Ok(())
    }
}
