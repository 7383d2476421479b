//! Common types shared across the CRS toolkit crates.

pub mod campaign;
pub mod observation;
pub mod time;

pub use campaign::{ArchiveFormat, Campaign, FieldMap, TimeEncoding};
pub use observation::{FileMetadata, RadarFile, RadarObservation, ShapeError, CRS_SOURCE};
pub use time::{TimeParseError, TimeWindow};
