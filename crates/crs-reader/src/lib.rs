//! Archive readers for NASA CRS (Cloud Radar System) radar data.
//!
//! Two read paths, both producing the same `RadarFile` view:
//!
//! - **IMPACTS** L1B archives are HDF5, with the time axis in seconds
//!   since the Unix epoch and data under the `Time`/`Products` groups.
//! - **GOES-R PLT / OLYMPEX / IPHEX** archives are netCDF array
//!   datasets with flat variables; the time axis is an hour offset from
//!   a base date the caller supplies (it comes from flight selection,
//!   not from the file).
//!
//! Variable names and time encodings come from the campaign registry in
//! `crs-common`, so there is one generic reader per container format
//! rather than one per campaign.
//!
//! On top of the per-file readers, [`range_query`] enumerates a data
//! directory by filename date token and aggregates every matching file
//! into a flat observation sequence, skipping unreadable files with a
//! warning instead of aborting.
//!
//! Values are read raw: no CF unit/scale interpretation is applied. The
//! only conversions are the documented ones (time normalization, range
//! meters to kilometers).

mod array;
pub mod config;
mod discovery;
pub mod error;
mod impacts;
mod query;

pub use array::read_array_dataset;
pub use config::QueryConfig;
pub use discovery::{discover_files, parse_file_date, ArchiveFile};
pub use error::{ReaderError, Result};
pub use impacts::{describe_structure, read_impacts};
pub use query::{latest_week, range_query, RangeQueryResult};

use chrono::{DateTime, Utc};
use std::path::Path;

use crs_common::{ArchiveFormat, Campaign, RadarFile};

/// Read a campaign archive into a fully materialized `RadarFile`.
///
/// `base_date` is required for the hour-offset campaigns (everything but
/// IMPACTS) and ignored for IMPACTS. The file handle is opened, drained,
/// and closed inside this call; nothing is held across it.
pub fn read_archive(
    path: &Path,
    campaign: Campaign,
    base_date: Option<DateTime<Utc>>,
) -> Result<RadarFile> {
    match campaign.format() {
        ArchiveFormat::Hdf5 => read_impacts(path),
        ArchiveFormat::NetCdf => {
            let base = base_date.ok_or_else(|| {
                ReaderError::Conversion(format!(
                    "campaign {} stores hour offsets; a base date is required",
                    campaign
                ))
            })?;
            read_array_dataset(path, campaign, base)
        }
    }
}
