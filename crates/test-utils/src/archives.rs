//! Writers for small synthetic campaign archives.
//!
//! The files mimic the on-disk layout the readers expect: the IMPACTS
//! HDF5 group hierarchy and the flat netCDF variable sets of the other
//! campaigns. Data cells come from [`cell_matrix`](crate::cell_matrix)
//! so reader tests can assert exact values.

use std::path::Path;

use hdf5::types::VarLenUnicode;

use crs_common::Campaign;

use crate::cell_matrix;

/// Options for [`write_impacts_archive`].
#[derive(Debug, Clone)]
pub struct ImpactsArchiveSpec {
    /// `Time/Data/TimeUTC` values, seconds since the Unix epoch.
    pub time_seconds: Vec<f64>,
    /// `Products/Information/Range` values, meters.
    pub range_m: Vec<f64>,
    /// Whether to write `Products/Data/Velocity_corrected`.
    pub with_velocity: bool,
    /// String attributes to set at file level, e.g. `("Aircraft", "P-3B")`.
    pub attrs: Vec<(String, String)>,
}

impl Default for ImpactsArchiveSpec {
    fn default() -> Self {
        Self {
            time_seconds: vec![0.0, 60.0],
            range_m: vec![1000.0, 2000.0],
            with_velocity: true,
            attrs: Vec::new(),
        }
    }
}

/// Write a synthetic IMPACTS HDF5 archive.
pub fn write_impacts_archive(path: &Path, spec: &ImpactsArchiveSpec) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;

    let time_group = file.create_group("Time")?.create_group("Data")?;
    time_group
        .new_dataset_builder()
        .with_data(&spec.time_seconds)
        .create("TimeUTC")?;

    let products = file.create_group("Products")?;
    products
        .create_group("Information")?
        .new_dataset_builder()
        .with_data(&spec.range_m)
        .create("Range")?;

    let data = products.create_group("Data")?;
    let num_times = spec.time_seconds.len();
    let num_heights = spec.range_m.len();
    write_matrix(&data, "dBZe", num_times, num_heights, 0.0)?;
    if spec.with_velocity {
        write_matrix(&data, "Velocity_corrected", num_times, num_heights, 100.0)?;
    }

    for (name, value) in &spec.attrs {
        let value: VarLenUnicode = value.parse().expect("attribute value is valid UTF-8");
        file.new_attr::<VarLenUnicode>()
            .create(name.as_str())?
            .write_scalar(&value)?;
    }

    Ok(())
}

fn write_matrix(
    group: &hdf5::Group,
    name: &str,
    num_times: usize,
    num_heights: usize,
    offset: f32,
) -> hdf5::Result<()> {
    let matrix = cell_matrix(num_times, num_heights, offset);
    let ds = group
        .new_dataset::<f32>()
        .shape((num_times, num_heights))
        .create(name)?;
    ds.write_raw(matrix.as_slice().expect("matrix is contiguous"))?;
    Ok(())
}

/// Write a synthetic netCDF campaign archive using the campaign's field
/// names (`time`/`ref`/`dop` for GOES-R PLT, `timed`/`zku`/`dopcorr` for
/// OLYMPEX and IPHEX).
pub fn write_netcdf_archive(
    path: &Path,
    campaign: Campaign,
    hours: &[f64],
    range_m: &[f64],
    with_velocity: bool,
) -> Result<(), netcdf::Error> {
    let fields = campaign.field_map();
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", hours.len())?;
    file.add_dimension("range", range_m.len())?;

    let mut time_var = file.add_variable::<f64>(fields.time, &["time"])?;
    time_var.put_values(hours, ..)?;

    let mut range_var = file.add_variable::<f64>(fields.range, &["range"])?;
    range_var.put_values(range_m, ..)?;

    let reflectivity = cell_matrix(hours.len(), range_m.len(), 0.0);
    let mut refl_var = file.add_variable::<f32>(fields.reflectivity, &["time", "range"])?;
    refl_var.put_values(reflectivity.as_slice().expect("matrix is contiguous"), ..)?;

    if with_velocity {
        let velocity = cell_matrix(hours.len(), range_m.len(), 100.0);
        let mut vel_var = file.add_variable::<f32>(fields.velocity, &["time", "range"])?;
        vel_var.put_values(velocity.as_slice().expect("matrix is contiguous"), ..)?;
    }

    Ok(())
}

/// Write a file that carries the right extension but is not a valid
/// archive, for partial-failure tests.
pub fn write_malformed_archive(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, b"this is not an HDF5 or netCDF file")
}
