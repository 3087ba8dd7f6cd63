//! The case study run: unzip, read the genesis step, extract the layered
//! variable, take the cross-section and render both plots.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use cross_section::cross_section_with;
use ingestion::{genesis_step, list_files, read_track_data, step_time, unzip};
use netcdf_parser::{array_for_transversal, read_gridded_field, read_layered_field, read_mask_shape};
use renderer::{create_custom_colormap, render_cross_section, render_moisture_map, save_png};

use crate::config::CaseConfig;

/// Files produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutputs {
    /// Step listing of the extracted archive, sorted.
    pub steps: Vec<String>,
    pub genesis: PathBuf,
    pub cross_file: PathBuf,
    pub map: PathBuf,
    pub section: PathBuf,
    /// Track records read, when a track file is configured.
    pub track_records: Option<usize>,
    /// Cells inside the storm mask, when a mask file is configured.
    pub masked_cells: Option<usize>,
}

/// Run the whole case.
pub fn run_case(config: &CaseConfig) -> Result<CaseOutputs> {
    let vars = &config.variables;

    unzip(&config.archive, &config.extract_dir)
        .with_context(|| format!("Failed to extract {}", config.archive.display()))?;
    let steps = list_files(&config.extract_dir)
        .with_context(|| format!("Failed to list {}", config.extract_dir.display()))?;
    let genesis = config
        .extract_dir
        .join(genesis_step(&config.extract_dir, &steps)?);
    info!(
        steps = steps.len(),
        genesis = %genesis.display(),
        valid_time = ?step_time(&genesis.to_string_lossy()),
        "Prepared case steps"
    );

    let integrated = read_gridded_field(&genesis, &vars.lat, &vars.lon, &vars.integrated)
        .with_context(|| format!("Failed to read {} from {}", vars.integrated, genesis.display()))?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    let cross_file = config.cross_file_path();
    array_for_transversal(&genesis, &cross_file, &vars.layers)
        .with_context(|| format!("Failed to extract {} to {}", vars.layers, cross_file.display()))?;
    let layered = read_layered_field(&cross_file, &vars.lat, &vars.lon, &vars.layers)
        .with_context(|| format!("Failed to read {} from {}", vars.layers, cross_file.display()))?;

    let transect = &config.transect;
    let section = cross_section_with(
        &layered,
        transect.start,
        transect.end,
        transect.steps,
        transect.interpolation,
    )
    .context("Failed to compute cross-section")?;
    if section.outside_count() == section.steps() {
        warn!("Transect lies entirely outside the grid");
    }

    let colormap = create_custom_colormap().context("Failed to build colormap")?;
    let dpi = config.style.dpi;

    let map_path = config.map_path();
    let map = render_moisture_map(
        &integrated,
        transect.start,
        transect.end,
        &colormap,
        &config.style,
        &config.map,
    )
    .context("Failed to render moisture map")?;
    save_png(&map, &map_path, dpi)
        .with_context(|| format!("Failed to write {}", map_path.display()))?;

    let section_path = config.section_path();
    let plot = render_cross_section(&section, &colormap.cmap, &config.style, &config.section)
        .context("Failed to render cross-section")?;
    save_png(&plot, &section_path, dpi)
        .with_context(|| format!("Failed to write {}", section_path.display()))?;

    let track_records = match &config.track_file {
        Some(path) => Some(log_track(path, &genesis)?),
        None => None,
    };
    let masked_cells = match &config.mask_file {
        Some(path) => {
            let mask = read_mask_shape(path, &config.mask_variable)
                .with_context(|| format!("Failed to read mask {}", path.display()))?;
            info!(
                variable = %mask.variable,
                rows = mask.rows,
                cols = mask.cols,
                masked = mask.masked_count(),
                "Read storm mask"
            );
            Some(mask.masked_count())
        }
        None => None,
    };

    info!(
        map = %map_path.display(),
        section = %section_path.display(),
        "Case study complete"
    );

    Ok(CaseOutputs {
        steps,
        genesis,
        cross_file,
        map: map_path,
        section: section_path,
        track_records,
        masked_cells,
    })
}

/// Read the track and log the record matching the genesis step.
fn log_track(path: &Path, genesis: &Path) -> Result<usize> {
    let track = read_track_data(path)
        .with_context(|| format!("Failed to read track {}", path.display()))?;
    let code = genesis
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match track.at(&code) {
        Some(record) => info!(
            date = %record.date_code,
            lat = record.lat,
            lon = record.lon,
            mslp = record.mslp,
            radius = record.radius,
            "Storm position at genesis"
        ),
        None => warn!(step = %code, "No track record for the genesis step"),
    }
    Ok(track.len())
}
