//! File discovery by filename date token.
//!
//! Campaign archives embed their flight date in the filename
//! (`IMPACTS_CRS_L1B_20200207_P3B.h5`). Discovery lists a directory,
//! keeps files with the campaign's extension, and extracts that date.
//! Files that do not match the naming convention are skipped with a
//! warning, never treated as fatal.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crs_common::time::{base_datetime, parse_yyyymmdd};
use crs_common::Campaign;

use crate::error::Result;

/// A campaign archive found on disk, with its embedded flight date.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Flight date extracted from the filename.
    pub date: NaiveDate,
}

impl ArchiveFile {
    /// Midnight UTC of the flight date, the base instant for hour-offset
    /// time axes.
    pub fn base_datetime(&self) -> DateTime<Utc> {
        base_datetime(self.date)
    }
}

/// List a directory's campaign archives, sorted by date then name.
///
/// Fails only when the directory itself cannot be read; individual
/// entries that do not match the campaign's extension or naming
/// convention are skipped (the latter with a warning).
pub fn discover_files(dir: &Path, campaign: Campaign) -> Result<Vec<ArchiveFile>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !name.to_lowercase().ends_with(campaign.file_extension()) {
            continue;
        }

        match parse_file_date(campaign, name) {
            Some(date) => files.push(ArchiveFile {
                path: path.clone(),
                file_name: name.to_string(),
                date,
            }),
            None => {
                warn!(
                    file = name,
                    campaign = campaign.name(),
                    "Skipping file with unrecognized naming convention"
                );
            }
        }
    }

    files.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.file_name.cmp(&b.file_name)));
    Ok(files)
}

/// Extract the embedded `YYYYMMDD` flight date from an archive filename.
///
/// Campaigns with a fixed token position (IMPACTS) use it; the others
/// scan the underscore-separated tokens for the first parseable date.
pub fn parse_file_date(campaign: Campaign, filename: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = filename.split('_').collect();
    match campaign.date_token_index() {
        Some(index) => tokens.get(index).and_then(|t| parse_token(t)),
        None => tokens.iter().find_map(|t| parse_token(t)),
    }
}

// A date token may carry the file extension when it is last in the name.
fn parse_token(token: &str) -> Option<NaiveDate> {
    let bare = token.split('.').next().unwrap_or(token);
    parse_yyyymmdd(bare)
}
