//! In-memory `RadarFile` fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::Array2;

use crs_common::{Campaign, FileMetadata, RadarFile};

/// Fixed flight start used by all fixtures: 2020-02-07T12:00:00Z.
pub fn flight_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 2, 7, 12, 0, 0).unwrap()
}

/// Time axis with one-minute spacing starting at [`flight_start`].
pub fn minute_times(num_times: usize) -> Vec<DateTime<Utc>> {
    (0..num_times)
        .map(|i| flight_start() + Duration::minutes(i as i64))
        .collect()
}

/// Deterministic T x H matrix: cell `(i, j)` holds `i * num_heights + j`
/// plus `offset`, so tests can assert exactly which rows survived a
/// subset.
pub fn cell_matrix(num_times: usize, num_heights: usize, offset: f32) -> Array2<f32> {
    Array2::from_shape_fn((num_times, num_heights), |(i, j)| {
        (i * num_heights + j) as f32 + offset
    })
}

/// A radar file with both reflectivity and Doppler velocity.
pub fn radar_file(num_times: usize, num_heights: usize) -> RadarFile {
    RadarFile::new(
        Campaign::Impacts,
        minute_times(num_times),
        (0..num_heights).map(|j| 0.5 * (j + 1) as f64).collect(),
        cell_matrix(num_times, num_heights, 0.0),
        Some(cell_matrix(num_times, num_heights, 100.0)),
        FileMetadata::default(),
    )
    .expect("fixture shapes are consistent")
}

/// A radar file whose source lacks the corrected-velocity field.
pub fn radar_file_without_velocity(num_times: usize, num_heights: usize) -> RadarFile {
    RadarFile::new(
        Campaign::Olympex,
        minute_times(num_times),
        (0..num_heights).map(|j| 0.5 * (j + 1) as f64).collect(),
        cell_matrix(num_times, num_heights, 0.0),
        None,
        FileMetadata::default(),
    )
    .expect("fixture shapes are consistent")
}
