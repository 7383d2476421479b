//! HDF5 read path for IMPACTS CRS L1B archives.
//!
//! Layout of an IMPACTS file:
//! - `Time/Data/TimeUTC`: 1D time axis, seconds since the Unix epoch
//! - `Products/Information/Range`: 1D range axis in meters
//! - `Products/Data/dBZe`: 2D reflectivity in dBZ, `[time][range]`
//! - `Products/Data/Velocity_corrected`: 2D corrected Doppler velocity
//!   in m/s, optional
//! - file-level attributes: flight date, aircraft, processing level,
//!   quality flag

use std::path::Path;

use chrono::NaiveDate;
use hdf5::types::{VarLenAscii, VarLenUnicode};
use ndarray::Array2;
use tracing::{debug, warn};

use crs_common::time::epoch_seconds;
use crs_common::{Campaign, FileMetadata, RadarFile};

use crate::error::{ReaderError, Result};

/// Read an IMPACTS HDF5 archive into a `RadarFile`.
///
/// The Doppler velocity field is optional: when it is absent or
/// unreadable the result simply carries no velocity matrix. All other
/// fields are required. On a failed parse the file's group/dataset
/// structure is logged at debug level to aid diagnosis.
pub fn read_impacts(path: &Path) -> Result<RadarFile> {
    match read_impacts_inner(path) {
        Ok(file) => Ok(file),
        Err(err) => {
            if let Ok(structure) = describe_structure(path) {
                debug!(
                    path = %path.display(),
                    structure = %structure,
                    "IMPACTS archive structure at parse failure"
                );
            }
            Err(err)
        }
    }
}

fn read_impacts_inner(path: &Path) -> Result<RadarFile> {
    let fields = Campaign::Impacts.field_map();
    let file = hdf5::File::open(path)
        .map_err(|e| ReaderError::Archive(format!("{}: {}", path.display(), e)))?;

    let seconds = read_vector(&file, fields.time)?;
    let times: Vec<_> = seconds.iter().map(|&s| epoch_seconds(s)).collect();

    // Range is stored in meters; the data model carries kilometers.
    let heights_km: Vec<f64> = read_vector(&file, fields.range)?
        .iter()
        .map(|m| m / 1000.0)
        .collect();

    let reflectivity = read_matrix(&file, fields.reflectivity, times.len(), heights_km.len())?;

    let doppler_velocity =
        match read_matrix(&file, fields.velocity, times.len(), heights_km.len()) {
            Ok(matrix) => Some(matrix),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    field = fields.velocity,
                    error = %err,
                    "Doppler velocity unavailable, continuing without it"
                );
                None
            }
        };

    let metadata = extract_metadata(&file, path);

    RadarFile::new(
        Campaign::Impacts,
        times,
        heights_km,
        reflectivity,
        doppler_velocity,
        metadata,
    )
    .map_err(|e| ReaderError::InvalidFormat(e.to_string()))
}

fn dataset(file: &hdf5::File, name: &str) -> Result<hdf5::Dataset> {
    file.dataset(name)
        .map_err(|_| ReaderError::MissingData(name.to_string()))
}

fn read_vector(file: &hdf5::File, name: &str) -> Result<Vec<f64>> {
    dataset(file, name)?
        .read_raw::<f64>()
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
}

fn read_matrix(file: &hdf5::File, name: &str, num_times: usize, num_heights: usize) -> Result<Array2<f32>> {
    let ds = dataset(file, name)?;
    let shape = ds.shape();
    if shape != [num_times, num_heights] {
        return Err(ReaderError::InvalidFormat(format!(
            "{} has shape {:?}, expected [{}, {}]",
            name, shape, num_times, num_heights
        )));
    }
    let values = ds
        .read_raw::<f32>()
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))?;
    Array2::from_shape_vec((num_times, num_heights), values)
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
}

/// Extract file-level attribute metadata.
///
/// Every attribute is optional; recognized keys land in the typed fields
/// and everything else in `extra`. Attribute read failures degrade to
/// the documented placeholder defaults.
fn extract_metadata(file: &hdf5::File, path: &Path) -> FileMetadata {
    let mut meta = FileMetadata::default();

    let names = match file.attr_names() {
        Ok(names) => names,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not list archive attributes");
            return meta;
        }
    };

    for name in names {
        match name.as_str() {
            "Latitude" | "Longitude" => continue, // numeric, handled below
            "FlightDate" => {
                if let Some(value) = read_string_attr(file, &name) {
                    meta.flight_date = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok();
                }
            }
            "Aircraft" => {
                if let Some(value) = read_string_attr(file, &name) {
                    meta.flight_info = value;
                }
            }
            "ProcessingLevel" => {
                if let Some(value) = read_string_attr(file, &name) {
                    meta.processing_level = value;
                }
            }
            "Quality" => {
                if let Some(value) = read_string_attr(file, &name) {
                    meta.quality = value;
                }
            }
            _ => {
                if let Some(value) = read_string_attr(file, &name) {
                    meta.extra.insert(name.to_lowercase(), value);
                }
            }
        }
    }

    if let Some(lat) = read_f64_attr(file, "Latitude") {
        meta.latitude = lat;
    }
    if let Some(lon) = read_f64_attr(file, "Longitude") {
        meta.longitude = lon;
    }

    meta
}

/// Read a string attribute, accepting both UTF-8 and byte-string (ASCII)
/// storage.
fn read_string_attr(file: &hdf5::File, name: &str) -> Option<String> {
    let attr = file.attr(name).ok()?;
    if let Ok(value) = attr.read_scalar::<VarLenUnicode>() {
        return Some(value.to_string());
    }
    if let Ok(value) = attr.read_scalar::<VarLenAscii>() {
        return Some(value.to_string());
    }
    debug!(attr = name, "Skipping attribute with unsupported type");
    None
}

fn read_f64_attr(file: &hdf5::File, name: &str) -> Option<f64> {
    file.attr(name).ok()?.read_scalar::<f64>().ok()
}

/// Render the group/dataset tree of an HDF5 archive, one entry per line.
///
/// Used on the parse-failure path so a log reader can see what the file
/// actually contains.
pub fn describe_structure(path: &Path) -> Result<String> {
    let file = hdf5::File::open(path)
        .map_err(|e| ReaderError::Archive(format!("{}: {}", path.display(), e)))?;
    let mut lines = Vec::new();
    visit(&file, "", &mut lines);
    Ok(lines.join("\n"))
}

fn visit(group: &hdf5::Group, prefix: &str, out: &mut Vec<String>) {
    let names = match group.member_names() {
        Ok(names) => names,
        Err(_) => return,
    };
    for name in names {
        let full = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };
        if let Ok(sub) = group.group(&name) {
            out.push(format!("Group: {}", full));
            visit(&sub, &full, out);
        } else if let Ok(ds) = group.dataset(&name) {
            out.push(format!("Dataset: {}, shape {:?}", full, ds.shape()));
        }
    }
}
