//! Typed readers for case-study NetCDF files.
//!
//! Variables are read in storage order and re-laid out as `[layer][lat][lon]`.
//! Length-1 dimensions (a singleton `time`, for instance) are squeezed away, so
//! `(time=1, layers, lat, lon)` and `(layers, lat, lon)` read identically.

use std::path::{Path, PathBuf};

use case_common::{Axis, GriddedField, LatLonGrid, LayeredField};
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{
    get_string_attr, open_dataset, read_decoded_values, read_f64_values, require_variable,
    variable_dims, DimInfo,
};

/// Latitude variable of WRF-style mask files.
pub const MASK_LAT_VAR: &str = "XLAT";
/// Longitude variable of WRF-style mask files.
pub const MASK_LON_VAR: &str = "XLONG";

/// An open dataset. The underlying file is closed when this is dropped.
pub struct CaseDataset {
    path: PathBuf,
    file: netcdf::File,
}

impl CaseDataset {
    /// Open a dataset for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_dataset(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all variables in the file.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    /// Read a 1-D coordinate variable, returning its dimension name and values.
    pub fn coordinate(&self, name: &str) -> NetCdfResult<(String, Vec<f64>)> {
        let var = require_variable(&self.file, name)?;
        let dims: Vec<DimInfo> = squeeze(&variable_dims(&var), &[]);
        if dims.len() > 1 {
            return Err(NetCdfError::InvalidFormat(format!(
                "coordinate '{}' has {} non-singleton dimensions, expected 1",
                name,
                dims.len()
            )));
        }
        let dim_name = dims
            .first()
            .map(|d| d.name.clone())
            .or_else(|| var.dimensions().first().map(|d| d.name()))
            .ok_or_else(|| {
                NetCdfError::InvalidFormat(format!("coordinate '{name}' is a scalar"))
            })?;

        Ok((dim_name, read_f64_values(&var)?))
    }

    /// Build the horizontal grid from the named latitude and longitude variables.
    fn grid(&self, lat_name: &str, lon_name: &str) -> NetCdfResult<(LatLonGrid, String, String)> {
        let (lat_dim, lat) = self.coordinate(lat_name)?;
        let (lon_dim, lon) = self.coordinate(lon_name)?;
        let grid = LatLonGrid::new(Axis::new(lat_name, lat)?, Axis::new(lon_name, lon)?);
        Ok((grid, lat_dim, lon_dim))
    }

    /// Read a 2-D field on the lat/lon grid.
    pub fn gridded_field(
        &self,
        lat_name: &str,
        lon_name: &str,
        variable: &str,
    ) -> NetCdfResult<GriddedField> {
        let (grid, lat_dim, lon_dim) = self.grid(lat_name, lon_name)?;
        let var = require_variable(&self.file, variable)?;
        let dims = variable_dims(&var);
        let values = read_decoded_values(&var)?;

        let layout = Layout::resolve(variable, &dims, &lat_dim, &lon_dim)?;
        if let Some(layer) = &layout.layer {
            return Err(NetCdfError::InvalidFormat(format!(
                "variable '{}' has an extra dimension '{}' ({}), expected a 2-D field",
                variable, layer.name, layer.len
            )));
        }
        check_axis_len(variable, &lat_dim, layout.lat.len, grid.lat.len())?;
        check_axis_len(variable, &lon_dim, layout.lon.len, grid.lon.len())?;

        let values = layout.gather(&values);
        let units = get_string_attr(&var, "units");
        let field = GriddedField::new(variable, units, grid, values)?;

        debug!(
            variable = variable,
            rows = field.grid.lat.len(),
            cols = field.grid.lon.len(),
            range = ?field.value_range(),
            "Read gridded field"
        );
        Ok(field)
    }

    /// Read a 3-D field with one vertical dimension besides lat/lon.
    ///
    /// A variable without a vertical dimension reads as a single layer at 0.
    pub fn layered_field(
        &self,
        lat_name: &str,
        lon_name: &str,
        variable: &str,
    ) -> NetCdfResult<LayeredField> {
        let (grid, lat_dim, lon_dim) = self.grid(lat_name, lon_name)?;
        let var = require_variable(&self.file, variable)?;
        let dims = variable_dims(&var);
        let values = read_decoded_values(&var)?;

        let layout = Layout::resolve(variable, &dims, &lat_dim, &lon_dim)?;
        check_axis_len(variable, &lat_dim, layout.lat.len, grid.lat.len())?;
        check_axis_len(variable, &lon_dim, layout.lon.len, grid.lon.len())?;

        let (layer_name, layers) = match &layout.layer {
            Some(dim) => {
                let coords = match self.file.variable(&dim.name) {
                    Some(coord) => read_f64_values(&coord)?,
                    None => (0..dim.len).map(|i| i as f64).collect(),
                };
                (dim.name.clone(), coords)
            }
            None => ("layers".to_string(), vec![0.0]),
        };

        let values = layout.gather(&values);
        let units = get_string_attr(&var, "units");
        let field = LayeredField::new(variable, units, grid, layer_name, layers, values)?;

        debug!(
            variable = variable,
            layers = field.num_layers(),
            rows = field.grid.lat.len(),
            cols = field.grid.lon.len(),
            "Read layered field"
        );
        Ok(field)
    }
}

/// Read a 2-D field from a file.
pub fn read_gridded_field<P: AsRef<Path>>(
    path: P,
    lat_name: &str,
    lon_name: &str,
    variable: &str,
) -> NetCdfResult<GriddedField> {
    CaseDataset::open(path)?.gridded_field(lat_name, lon_name, variable)
}

/// Read a layered field from a file.
pub fn read_layered_field<P: AsRef<Path>>(
    path: P,
    lat_name: &str,
    lon_name: &str,
    variable: &str,
) -> NetCdfResult<LayeredField> {
    CaseDataset::open(path)?.layered_field(lat_name, lon_name, variable)
}

/// Names of all variables in a file.
pub fn list_variables<P: AsRef<Path>>(path: P) -> NetCdfResult<Vec<String>> {
    Ok(CaseDataset::open(path)?.variable_names())
}

/// Storm-radius mask on the model's native 2-D grid.
#[derive(Debug, Clone)]
pub struct MaskShape {
    pub variable: String,
    pub rows: usize,
    pub cols: usize,
    /// Latitudes, one per cell, row-major.
    pub lat: Vec<f64>,
    /// Longitudes, one per cell, row-major.
    pub lon: Vec<f64>,
    /// 1 for points inside the mask.
    pub values: Vec<f32>,
}

impl MaskShape {
    /// Number of cells flagged as inside the mask.
    pub fn masked_count(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1.0).count()
    }
}

/// Read the storm mask stored under a timestamp-named variable (e.g. `2002020812`).
pub fn read_mask_shape<P: AsRef<Path>>(path: P, variable: &str) -> NetCdfResult<MaskShape> {
    let dataset = CaseDataset::open(path)?;
    let file = &dataset.file;

    let mask_var = require_variable(file, variable)?;
    let dims = squeeze(&variable_dims(&mask_var), &[]);
    if dims.len() != 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "mask '{}' has {} non-singleton dimensions, expected 2",
            variable,
            dims.len()
        )));
    }
    let (rows, cols) = (dims[0].len, dims[1].len);
    let values = read_decoded_values(&mask_var)?;

    let lat = read_f64_values(&require_variable(file, MASK_LAT_VAR)?)?;
    let lon = read_f64_values(&require_variable(file, MASK_LON_VAR)?)?;
    for (name, coords) in [(MASK_LAT_VAR, &lat), (MASK_LON_VAR, &lon)] {
        if coords.len() != rows * cols {
            return Err(NetCdfError::InvalidFormat(format!(
                "'{}' has {} values, mask has {}x{}",
                name,
                coords.len(),
                rows,
                cols
            )));
        }
    }

    let mask = MaskShape {
        variable: variable.to_string(),
        rows,
        cols,
        lat,
        lon,
        values,
    };
    info!(
        path = %dataset.path.display(),
        variable = variable,
        rows = rows,
        cols = cols,
        masked = mask.masked_count(),
        "Read mask shape"
    );
    Ok(mask)
}

/// Drop length-1 dimensions unless their name is listed in `keep`.
fn squeeze(dims: &[DimInfo], keep: &[&str]) -> Vec<DimInfo> {
    dims.iter()
        .filter(|d| d.len != 1 || keep.contains(&d.name.as_str()))
        .cloned()
        .collect()
}

fn check_axis_len(variable: &str, dim: &str, found: usize, expected: usize) -> NetCdfResult<()> {
    if found != expected {
        return Err(NetCdfError::InvalidFormat(format!(
            "variable '{variable}' has {found} points along '{dim}', coordinate has {expected}"
        )));
    }
    Ok(())
}

/// Position and stride of one dimension inside a variable's storage.
#[derive(Debug, Clone)]
struct Placed {
    name: String,
    len: usize,
    stride: usize,
}

/// How a variable's storage maps onto `[layer][lat][lon]`.
#[derive(Debug)]
struct Layout {
    layer: Option<Placed>,
    lat: Placed,
    lon: Placed,
}

impl Layout {
    fn resolve(variable: &str, dims: &[DimInfo], lat_dim: &str, lon_dim: &str) -> NetCdfResult<Self> {
        let mut stride = 1;
        let mut placed = Vec::with_capacity(dims.len());
        for dim in dims.iter().rev() {
            placed.push(Placed {
                name: dim.name.clone(),
                len: dim.len,
                stride,
            });
            stride *= dim.len;
        }
        placed.reverse();

        let take = |name: &str| {
            placed.iter().find(|p| p.name == name).cloned().ok_or_else(|| {
                NetCdfError::MissingData(format!(
                    "dimension '{name}' on variable '{variable}'"
                ))
            })
        };
        let lat = take(lat_dim)?;
        let lon = take(lon_dim)?;

        let mut extra = placed
            .iter()
            .filter(|p| p.name != lat_dim && p.name != lon_dim && p.len != 1);
        let layer = extra.next().cloned();
        if let Some(other) = extra.next() {
            return Err(NetCdfError::InvalidFormat(format!(
                "variable '{}' has more than one vertical dimension ('{}' and '{}')",
                variable,
                layer.as_ref().map(|l| l.name.as_str()).unwrap_or_default(),
                other.name
            )));
        }

        Ok(Self { layer, lat, lon })
    }

    fn gather(&self, values: &[f32]) -> Vec<f32> {
        let (n_layers, layer_stride) = self
            .layer
            .as_ref()
            .map(|l| (l.len, l.stride))
            .unwrap_or((1, 0));

        let mut out = Vec::with_capacity(n_layers * self.lat.len * self.lon.len);
        for l in 0..n_layers {
            for r in 0..self.lat.len {
                for c in 0..self.lon.len {
                    let idx = l * layer_stride + r * self.lat.stride + c * self.lon.stride;
                    out.push(values.get(idx).copied().unwrap_or(f32::NAN));
                }
            }
        }
        out
    }
}
