//! Sub-dataset extraction.
//!
//! Copies one variable together with every coordinate of the dataset and all
//! attributes into a new file, so downstream tools can open a small
//! self-describing dataset. Coordinates are the variables named after their
//! own dimension plus the auxiliary ones listed in any variable's
//! `coordinates` attribute.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use netcdf::types::{FloatType, IntType, NcTypeDescriptor, NcVariableType};
use tracing::{info, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{
    get_string_attr, global_attributes, open_dataset, require_variable, silence_hdf5_errors,
    variable_attributes, variable_dims,
};

/// Summary of a completed extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    pub variable: String,
    pub coordinates: Vec<String>,
    pub dimensions: Vec<(String, usize)>,
}

/// Copy `variable_name` plus all coordinate variables and attributes of
/// `input_file` into a new `output_file`, replacing any existing file.
///
/// Every variable keeps its storage type. A missing variable fails with
/// [`NetCdfError::MissingData`]; a partially written output is left in place.
pub fn array_for_transversal<P: AsRef<Path>, Q: AsRef<Path>>(
    input_file: P,
    output_file: Q,
    variable_name: &str,
) -> NetCdfResult<ExtractionSummary> {
    let input_file = input_file.as_ref();
    let output_file = output_file.as_ref();

    let input = open_dataset(input_file)?;
    let selected = require_variable(&input, variable_name)?;
    if !is_copyable(&selected) {
        return Err(NetCdfError::InvalidFormat(format!(
            "variable '{}' has non-numeric type {:?}",
            variable_name,
            selected.vartype()
        )));
    }

    let auxiliary = auxiliary_coordinates(&input);
    let mut coordinates = Vec::new();
    for var in input.variables() {
        let name = var.name();
        if name == variable_name || !(is_coordinate_variable(&var) || auxiliary.contains(&name)) {
            continue;
        }
        if is_copyable(&var) {
            coordinates.push(name);
        } else {
            warn!(
                coordinate = %name,
                vartype = ?var.vartype(),
                "Skipping non-numeric coordinate"
            );
        }
    }

    // Every dimension referenced by the copied variables, in first-seen order.
    let mut dimensions: BTreeMap<String, usize> = BTreeMap::new();
    let mut dim_order = Vec::new();
    for name in std::iter::once(variable_name).chain(coordinates.iter().map(String::as_str)) {
        let var = require_variable(&input, name)?;
        for dim in variable_dims(&var) {
            if dimensions.insert(dim.name.clone(), dim.len).is_none() {
                dim_order.push(dim.name);
            }
        }
    }

    silence_hdf5_errors();
    let mut output = netcdf::create(output_file).map_err(|e| {
        NetCdfError::InvalidFormat(format!(
            "Failed to create {}: {}",
            output_file.display(),
            e
        ))
    })?;

    for (name, value) in global_attributes(&input)? {
        output.add_attribute(&name, value)?;
    }

    // Unlimited dimensions are written at their current length.
    for name in &dim_order {
        output.add_dimension(name, dimensions[name])?;
    }

    for name in coordinates.iter().map(String::as_str).chain(std::iter::once(variable_name)) {
        copy_variable(&input, &mut output, name)?;
    }

    drop(output);
    drop(input);

    let summary = ExtractionSummary {
        variable: variable_name.to_string(),
        coordinates,
        dimensions: dim_order
            .into_iter()
            .map(|name| {
                let len = dimensions[&name];
                (name, len)
            })
            .collect(),
    };

    info!(
        variable = variable_name,
        output = %output_file.display(),
        coordinates = ?summary.coordinates,
        "Variable '{}' saved to '{}' along with coordinates and attributes.",
        variable_name,
        output_file.display()
    );

    Ok(summary)
}

/// A coordinate variable is one-dimensional and named after its dimension.
fn is_coordinate_variable(var: &netcdf::Variable) -> bool {
    let dims = var.dimensions();
    dims.len() == 1 && dims[0].name() == var.name()
}

/// Names listed in the `coordinates` attribute of any variable that exist
/// in the file.
fn auxiliary_coordinates(file: &netcdf::File) -> BTreeSet<String> {
    file.variables()
        .filter_map(|var| get_string_attr(&var, "coordinates"))
        .flat_map(|attr| {
            attr.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|name| file.variable(name).is_some())
        .collect()
}

fn is_copyable(var: &netcdf::Variable) -> bool {
    matches!(
        var.vartype(),
        NcVariableType::Int(_) | NcVariableType::Float(_)
    )
}

fn copy_variable(
    input: &netcdf::File,
    output: &mut netcdf::FileMut,
    name: &str,
) -> NetCdfResult<()> {
    let source = require_variable(input, name)?;
    match source.vartype() {
        NcVariableType::Float(FloatType::F64) => copy_values::<f64>(&source, output),
        NcVariableType::Float(FloatType::F32) => copy_values::<f32>(&source, output),
        NcVariableType::Int(IntType::I8) => copy_values::<i8>(&source, output),
        NcVariableType::Int(IntType::U8) => copy_values::<u8>(&source, output),
        NcVariableType::Int(IntType::I16) => copy_values::<i16>(&source, output),
        NcVariableType::Int(IntType::U16) => copy_values::<u16>(&source, output),
        NcVariableType::Int(IntType::I32) => copy_values::<i32>(&source, output),
        NcVariableType::Int(IntType::U32) => copy_values::<u32>(&source, output),
        NcVariableType::Int(IntType::I64) => copy_values::<i64>(&source, output),
        NcVariableType::Int(IntType::U64) => copy_values::<u64>(&source, output),
        other => Err(NetCdfError::InvalidFormat(format!(
            "cannot copy '{}' of type {:?}",
            name, other
        ))),
    }
}

/// Copy one variable in its own storage type: dimensions, attributes, values.
fn copy_values<T>(source: &netcdf::Variable, output: &mut netcdf::FileMut) -> NetCdfResult<()>
where
    T: NcTypeDescriptor + Copy,
{
    let name = source.name();
    let dim_names: Vec<String> = variable_dims(source).into_iter().map(|d| d.name).collect();
    let dim_refs: Vec<&str> = dim_names.iter().map(String::as_str).collect();
    let values = source.get_values::<T, _>(..).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read '{}': {}", name, e))
    })?;

    let mut target = output.add_variable::<T>(&name, &dim_refs)?;
    for (attr_name, value) in variable_attributes(source)? {
        target.put_attribute(&attr_name, value)?;
    }
    target.put_values(&values, ..)?;

    Ok(())
}
