//! netCDF read path for array-dataset campaigns (GOES-R PLT, OLYMPEX,
//! IPHEX).
//!
//! These archives are flat variable sets; the campaign registry supplies
//! the variable names. Time is a fractional hour offset from a base date
//! the caller provides out-of-band. Values are read raw, without CF
//! unit/scale decoding.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use tracing::warn;

use crs_common::time::hours_from_base;
use crs_common::{Campaign, FileMetadata, RadarFile};

use crate::error::{ReaderError, Result};

/// Read a netCDF campaign archive into a `RadarFile`.
///
/// `base` is the flight's base date (midnight UTC); every time value in
/// the file is an hour offset added to it. The Doppler velocity field is
/// optional, everything else is required.
pub fn read_array_dataset(path: &Path, campaign: Campaign, base: DateTime<Utc>) -> Result<RadarFile> {
    let fields = campaign.field_map();
    let file = netcdf::open(path)
        .map_err(|e| ReaderError::Archive(format!("{}: {}", path.display(), e)))?;

    let hours = read_vector(&file, fields.time)?;
    let times: Vec<_> = hours.iter().map(|&h| hours_from_base(base, h)).collect();

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

    let metadata = FileMetadata {
        flight_date: Some(base.date_naive()),
        ..FileMetadata::default()
    };

    RadarFile::new(
        campaign,
        times,
        heights_km,
        reflectivity,
        doppler_velocity,
        metadata,
    )
    .map_err(|e| ReaderError::InvalidFormat(e.to_string()))
}

fn variable<'f>(file: &'f netcdf::File, name: &str) -> Result<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| ReaderError::MissingData(format!("variable {}", name)))
}

fn read_vector(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    variable(file, name)?
        .get_values::<f64, _>(..)
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
}

fn read_matrix(
    file: &netcdf::File,
    name: &str,
    num_times: usize,
    num_heights: usize,
) -> Result<Array2<f32>> {
    let var = variable(file, name)?;
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    if shape != [num_times, num_heights] {
        return Err(ReaderError::InvalidFormat(format!(
            "{} has shape {:?}, expected [{}, {}]",
            name, shape, num_times, num_heights
        )));
    }
    let values = var
        .get_values::<f32, _>(..)
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))?;
    Array2::from_shape_vec((num_times, num_heights), values)
        .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
}
