//! Campaign registry for CRS field campaigns.
//!
//! Each campaign stores the same physical quantities under different
//! variable names and time encodings. A single static table drives both
//! readers instead of one code path per campaign.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS field campaigns with published archive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Campaign {
    /// IMPACTS (2020-2023, HDF5 L1B files)
    Impacts,
    /// GOES-R PLT (2017, netCDF-3 files)
    GoesRPlt,
    /// OLYMPEX (2015-2016, netCDF-3 files)
    Olympex,
    /// IPHEX (2014, netCDF-3 files)
    Iphex,
}

/// On-disk container format of a campaign's archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Hdf5,
    NetCdf,
}

/// How the time axis is encoded inside an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Seconds since 1970-01-01T00:00:00Z, stored in the file.
    SecondsSinceEpoch,
    /// Fractional hours from a base date supplied by the caller.
    HoursSinceBase,
}

/// Per-campaign variable names and time encoding.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    /// Time axis variable (1D, length T)
    pub time: &'static str,
    /// Range/height variable in meters (1D, length H)
    pub range: &'static str,
    /// Reflectivity in dBZ (2D, T x H)
    pub reflectivity: &'static str,
    /// Corrected Doppler velocity in m/s (2D, T x H)
    pub velocity: &'static str,
    /// Time axis encoding
    pub time_encoding: TimeEncoding,
}

static IMPACTS_FIELDS: FieldMap = FieldMap {
    time: "Time/Data/TimeUTC",
    range: "Products/Information/Range",
    reflectivity: "Products/Data/dBZe",
    velocity: "Products/Data/Velocity_corrected",
    time_encoding: TimeEncoding::SecondsSinceEpoch,
};

static GOESRPLT_FIELDS: FieldMap = FieldMap {
    time: "time",
    range: "range",
    reflectivity: "ref",
    velocity: "dop",
    time_encoding: TimeEncoding::HoursSinceBase,
};

// OLYMPEX and IPHEX share the Ku-band L1B naming.
static KU_BAND_FIELDS: FieldMap = FieldMap {
    time: "timed",
    range: "range",
    reflectivity: "zku",
    velocity: "dopcorr",
    time_encoding: TimeEncoding::HoursSinceBase,
};

impl Campaign {
    pub const ALL: [Campaign; 4] = [
        Campaign::Impacts,
        Campaign::GoesRPlt,
        Campaign::Olympex,
        Campaign::Iphex,
    ];

    /// Variable names and time encoding for this campaign's archives.
    pub fn field_map(self) -> &'static FieldMap {
        match self {
            Campaign::Impacts => &IMPACTS_FIELDS,
            Campaign::GoesRPlt => &GOESRPLT_FIELDS,
            Campaign::Olympex | Campaign::Iphex => &KU_BAND_FIELDS,
        }
    }

    pub fn format(self) -> ArchiveFormat {
        match self {
            Campaign::Impacts => ArchiveFormat::Hdf5,
            _ => ArchiveFormat::NetCdf,
        }
    }

    /// Archive filename extension, lowercase, with leading dot.
    pub fn file_extension(self) -> &'static str {
        match self.format() {
            ArchiveFormat::Hdf5 => ".h5",
            ArchiveFormat::NetCdf => ".nc",
        }
    }

    /// Fixed position of the `YYYYMMDD` token in underscore-separated
    /// filenames, where the campaign's naming convention defines one.
    ///
    /// IMPACTS names files `IMPACTS_CRS_L1B_YYYYMMDD_<flight>.h5`. The
    /// other campaigns have no fixed position; discovery scans tokens.
    pub fn date_token_index(self) -> Option<usize> {
        match self {
            Campaign::Impacts => Some(3),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Campaign::Impacts => "impacts",
            Campaign::GoesRPlt => "goesrplt",
            Campaign::Olympex => "olympex",
            Campaign::Iphex => "iphex",
        }
    }

    pub fn from_name(s: &str) -> Option<Campaign> {
        match s.to_lowercase().as_str() {
            "impacts" => Some(Campaign::Impacts),
            "goesrplt" => Some(Campaign::GoesRPlt),
            "olympex" => Some(Campaign::Olympex),
            "iphex" => Some(Campaign::Iphex),
            _ => None,
        }
    }
}

impl fmt::Display for Campaign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
