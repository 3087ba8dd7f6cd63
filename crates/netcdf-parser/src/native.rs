//! Thin helpers over the native netcdf library.
//!
//! Everything that touches `netcdf::Variable` directly lives here so the
//! readers above it can work with plain vectors and dimension lists.

use std::path::Path;
use std::sync::Once;

use netcdf::AttributeValue;
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// It only needs to be called once per process, but is safe to call multiple times.
/// Every public reader in this crate calls it before touching a file.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
pub fn open_dataset(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();

    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    debug!(path = %path.display(), "Opening NetCDF dataset");
    netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })
}

/// Look up a variable, failing with a lookup error that lists what is available.
pub fn require_variable<'f>(
    file: &'f netcdf::File,
    name: &str,
) -> NetCdfResult<netcdf::Variable<'f>> {
    file.variable(name).ok_or_else(|| {
        let available: Vec<String> = file.variables().map(|v| v.name()).collect();
        NetCdfError::MissingData(format!(
            "variable '{}' (available: {})",
            name,
            available.join(", ")
        ))
    })
}

/// Name and length of one dimension of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimInfo {
    pub name: String,
    pub len: usize,
}

/// Dimensions of a variable, in storage order.
pub fn variable_dims(var: &netcdf::Variable) -> Vec<DimInfo> {
    var.dimensions()
        .iter()
        .map(|d| DimInfo {
            name: d.name(),
            len: d.len(),
        })
        .collect()
}

/// Read every value of a variable as f64, in storage order.
pub fn read_f64_values(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    var.get_values::<f64, _>(..).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read '{}': {}", var.name(), e))
    })
}

/// Read a variable and apply CF decoding: fill and missing values become NaN,
/// then `scale_factor`/`add_offset` are applied.
pub fn read_decoded_values(var: &netcdf::Variable) -> NetCdfResult<Vec<f32>> {
    let raw = read_f64_values(var)?;

    let fill_value = get_f64_attr(var, "_FillValue");
    let missing_value = get_f64_attr(var, "missing_value");
    let scale = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);

    let is_missing = |v: f64| {
        v.is_nan()
            || fill_value.is_some_and(|f| v == f)
            || missing_value.is_some_and(|m| v == m)
    };

    Ok(raw
        .into_iter()
        .map(|v| {
            if is_missing(v) {
                f32::NAN
            } else {
                (v * scale + offset) as f32
            }
        })
        .collect())
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a numeric attribute as f64.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get a text attribute.
pub fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// All attributes of a variable as (name, value) pairs.
pub fn variable_attributes(var: &netcdf::Variable) -> NetCdfResult<Vec<(String, AttributeValue)>> {
    var.attributes()
        .map(|attr| Ok((attr.name().to_string(), attr.value()?)))
        .collect()
}

/// All global attributes of a file as (name, value) pairs.
pub fn global_attributes(file: &netcdf::File) -> NetCdfResult<Vec<(String, AttributeValue)>> {
    file.attributes()
        .map(|attr| Ok((attr.name().to_string(), attr.value()?)))
        .collect()
}
