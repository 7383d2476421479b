//! Time-range subsetting of decoded CRS radar files.
//!
//! Slicing is index-based: the indices of time-axis entries inside the
//! window (inclusive on both ends) select rows from the data matrices.
//! Timestamps are never recomputed and compared for equality, so
//! floating-point time reconstruction cannot drop rows.
//!
//! An empty match is a well-defined result (zero rows, "nothing to
//! plot"), not an error.

use chrono::{DateTime, Utc};
use ndarray::{Array2, Axis};

use crs_common::{RadarFile, TimeWindow};

/// Output of a subsetting call: owned copies of the selected rows.
///
/// `times` is the file's time axis filtered to the window, in original
/// order; `heights_km` passes through unchanged; the matrices are sliced
/// on the time axis only and keep shape `(times.len(), heights_km.len())`.
#[derive(Debug, Clone)]
pub struct Subset {
    pub times: Vec<DateTime<Utc>>,
    pub heights_km: Vec<f64>,
    pub reflectivity: Array2<f32>,
    pub doppler_velocity: Option<Array2<f32>>,
}

impl Subset {
    /// True when the window matched no time steps.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn num_times(&self) -> usize {
        self.times.len()
    }

    pub fn num_heights(&self) -> usize {
        self.heights_km.len()
    }

    /// First and last selected timestamp, `None` for an empty subset.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((*self.times.first()?, *self.times.last()?))
    }
}

/// Slice a radar file down to the rows whose timestamp falls inside the
/// window.
///
/// Open window bounds resolve to the file's first/last timestamp. Both
/// bounds are inclusive, so a window whose start and end equal an exact
/// timestamp in the file selects that one row. A window entirely outside
/// the file span (or with start after end) yields an empty subset.
pub fn subset(file: &RadarFile, window: &TimeWindow) -> Subset {
    let indices = match file.time_span() {
        Some((first, last)) => {
            let (start, end) = window.resolve(first, last);
            file.times
                .iter()
                .enumerate()
                .filter(|(_, t)| **t >= start && **t <= end)
                .map(|(i, _)| i)
                .collect::<Vec<usize>>()
        }
        // No time steps to select from.
        None => Vec::new(),
    };

    Subset {
        times: indices.iter().map(|&i| file.times[i]).collect(),
        heights_km: file.heights_km.clone(),
        reflectivity: file.reflectivity.select(Axis(0), &indices),
        doppler_velocity: file
            .doppler_velocity
            .as_ref()
            .map(|m| m.select(Axis(0), &indices)),
    }
}
