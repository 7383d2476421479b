//! Decoded radar data: the per-file matrix view and the flattened
//! per-cell observation record.

use chrono::{DateTime, NaiveDate, Utc};
use ndarray::Array2;
use std::collections::HashMap;
use std::sync::Arc;

use crate::campaign::Campaign;

/// Provenance string attached to every observation.
pub const CRS_SOURCE: &str = "NASA Cloud Radar System (CRS)";

/// File-level metadata extracted from archive attributes.
///
/// Every field is optional in the file; absent fields fall back to the
/// documented placeholders below.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// Instrument name, fixed for this toolkit.
    pub instrument: String,
    /// Processing level, `"L1B"` when the file does not say.
    pub processing_level: String,
    /// Quality flag, `"Good"` when the file does not say.
    pub quality: String,
    /// Aircraft/flight identifier, empty when absent.
    pub flight_info: String,
    /// Flight date from the file attributes, if present.
    pub flight_date: Option<NaiveDate>,
    /// Sensor latitude in degrees, 0.0 when the file carries no track.
    pub latitude: f64,
    /// Sensor longitude in degrees, 0.0 when the file carries no track.
    pub longitude: f64,
    /// Remaining file-level attributes, keys lowercased.
    pub extra: HashMap<String, String>,
}

impl Default for FileMetadata {
    fn default() -> Self {
        Self {
            instrument: "CRS".to_string(),
            processing_level: "L1B".to_string(),
            quality: "Good".to_string(),
            flight_info: String::new(),
            flight_date: None,
            latitude: 0.0,
            longitude: 0.0,
            extra: HashMap::new(),
        }
    }
}

/// One fully decoded CRS archive.
///
/// Invariant: `reflectivity` has shape `(times.len(), heights_km.len())`,
/// and `doppler_velocity`, when present, has the identical shape. NaN
/// cells mean "sensor returned no valid reading"; an absent velocity
/// matrix means "file lacks this instrument field entirely" -- the two
/// are never conflated.
///
/// A `RadarFile` is fully materialized in memory; the underlying file
/// handle is closed before the value is returned to callers.
#[derive(Debug, Clone)]
pub struct RadarFile {
    pub campaign: Campaign,
    /// Time axis, monotonically non-decreasing as stored by the file.
    pub times: Vec<DateTime<Utc>>,
    /// Range/height axis in kilometers above the sensor.
    pub heights_km: Vec<f64>,
    /// Reflectivity in dBZ, shape (T, H).
    pub reflectivity: Array2<f32>,
    /// Corrected Doppler velocity in m/s, shape (T, H), when the file
    /// carries the field.
    pub doppler_velocity: Option<Array2<f32>>,
    pub metadata: Arc<FileMetadata>,
}

/// Shape mismatch between the axes and a data matrix.
#[derive(Debug, thiserror::Error)]
#[error("{field} has shape [{rows}, {cols}], expected [{times}, {heights}]")]
pub struct ShapeError {
    pub field: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub times: usize,
    pub heights: usize,
}

impl RadarFile {
    /// Construct a radar file, validating the shape invariant.
    pub fn new(
        campaign: Campaign,
        times: Vec<DateTime<Utc>>,
        heights_km: Vec<f64>,
        reflectivity: Array2<f32>,
        doppler_velocity: Option<Array2<f32>>,
        metadata: FileMetadata,
    ) -> Result<Self, ShapeError> {
        let expected = (times.len(), heights_km.len());
        check_shape("reflectivity", &reflectivity, expected)?;
        if let Some(velocity) = &doppler_velocity {
            check_shape("doppler_velocity", velocity, expected)?;
        }
        Ok(Self {
            campaign,
            times,
            heights_km,
            reflectivity,
            doppler_velocity,
            metadata: Arc::new(metadata),
        })
    }

    pub fn num_times(&self) -> usize {
        self.times.len()
    }

    pub fn num_heights(&self) -> usize {
        self.heights_km.len()
    }

    /// First and last timestamp (the flight period), `None` for an empty
    /// time axis.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Flatten every `(time, height)` cell into an observation record,
    /// in time order then height order. NaN cells are kept; no filtering
    /// happens at read time.
    pub fn flatten(&self) -> Vec<RadarObservation> {
        let mut out = Vec::with_capacity(self.times.len() * self.heights_km.len());
        for (i, &timestamp) in self.times.iter().enumerate() {
            for (j, &height_km) in self.heights_km.iter().enumerate() {
                out.push(RadarObservation {
                    timestamp,
                    reflectivity: self.reflectivity[[i, j]],
                    doppler_velocity: self.doppler_velocity.as_ref().map(|m| m[[i, j]]),
                    height_km,
                    latitude: self.metadata.latitude,
                    longitude: self.metadata.longitude,
                    source: CRS_SOURCE,
                    metadata: Arc::clone(&self.metadata),
                });
            }
        }
        out
    }
}

fn check_shape(
    field: &'static str,
    matrix: &Array2<f32>,
    (times, heights): (usize, usize),
) -> Result<(), ShapeError> {
    let (rows, cols) = matrix.dim();
    if (rows, cols) != (times, heights) {
        return Err(ShapeError {
            field,
            rows,
            cols,
            times,
            heights,
        });
    }
    Ok(())
}

/// One radar measurement bin.
///
/// `reflectivity` may be NaN (no-return bin). `doppler_velocity` is
/// `None` only when the source file lacks the corrected-velocity field.
#[derive(Debug, Clone)]
pub struct RadarObservation {
    pub timestamp: DateTime<Utc>,
    /// Reflectivity in dBZ.
    pub reflectivity: f32,
    /// Corrected Doppler velocity in m/s.
    pub doppler_velocity: Option<f32>,
    /// Height of the measurement bin above the sensor, kilometers.
    pub height_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub source: &'static str,
    pub metadata: Arc<FileMetadata>,
}
