//! Multi-file range queries over a campaign data directory.
//!
//! A range query discovers archives whose embedded flight date falls
//! inside the requested range, reads them in parallel (bounded pool,
//! per-file deadline), and flattens every `(time, height)` cell into one
//! observation sequence ordered by file date then cell order.
//!
//! Partial failure is best-effort aggregation: a file that cannot be
//! read is logged and skipped, never aborting the query. The result
//! carries read/skip counters so "no file could be read" is
//! distinguishable from "files read, zero rows matched".

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crs_common::{Campaign, RadarObservation, RadarFile};

use crate::config::QueryConfig;
use crate::discovery::{discover_files, ArchiveFile};
use crate::error::{ReaderError, Result};
use crate::read_archive;

/// Outcome of a multi-file range query.
#[derive(Debug, Clone, Default)]
pub struct RangeQueryResult {
    /// Every cell of every successfully read file, in file-date order
    /// then time-then-height cell order.
    pub observations: Vec<RadarObservation>,
    /// Files read successfully.
    pub files_read: usize,
    /// Files in range that failed to read and were skipped.
    pub files_skipped: usize,
}

impl RangeQueryResult {
    /// True when no file in the requested range could be read. A result
    /// with `files_read > 0` and zero observations is instead a
    /// legitimate "nothing matched".
    pub fn is_empty_data(&self) -> bool {
        self.files_read == 0
    }
}

/// Read every campaign archive whose flight date falls inside
/// `[start, end]` (inclusive, compared by calendar date) and flatten the
/// results.
///
/// Fails only when the data directory cannot be listed or the read pool
/// cannot be built; per-file failures are skips.
pub fn range_query(
    config: &QueryConfig,
    campaign: Campaign,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<RangeQueryResult> {
    let all = discover_files(&config.data_dir, campaign)?;
    if all.is_empty() {
        warn!(
            dir = %config.data_dir.display(),
            campaign = campaign.name(),
            "No campaign archives found in data directory"
        );
        return Ok(RangeQueryResult::default());
    }

    let (start_date, end_date) = (start.date_naive(), end.date_naive());
    let in_range: Vec<ArchiveFile> = all
        .into_iter()
        .filter(|f| f.date >= start_date && f.date <= end_date)
        .collect();
    if in_range.is_empty() {
        debug!(
            campaign = campaign.name(),
            start = %start_date,
            end = %end_date,
            "No archives dated inside the requested range"
        );
        return Ok(RangeQueryResult::default());
    }

    let threads = config.max_parallel_reads.clamp(1, in_range.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("crs-query-{i}"))
        .build()
        .map_err(|e| ReaderError::Other(anyhow::anyhow!("failed to build read pool: {e}")))?;

    let timeout = config.read_timeout();
    // Indexed parallel collect preserves discovery order, which is
    // already date-then-name.
    let outcomes: Vec<Result<RadarFile>> = pool.install(|| {
        in_range
            .par_iter()
            .map(|file| read_with_timeout(file, campaign, timeout))
            .collect()
    });

    let mut result = RangeQueryResult::default();
    for (file, outcome) in in_range.iter().zip(outcomes) {
        match outcome {
            Ok(radar) => {
                result.files_read += 1;
                result.observations.extend(radar.flatten());
            }
            Err(err) => {
                result.files_skipped += 1;
                warn!(
                    file = %file.file_name,
                    error = %err,
                    "Skipping unreadable archive"
                );
            }
        }
    }

    if result.is_empty_data() {
        warn!(
            dir = %config.data_dir.display(),
            campaign = campaign.name(),
            files_in_range = in_range.len(),
            "No archive in the requested range could be read"
        );
    } else {
        info!(
            campaign = campaign.name(),
            files_read = result.files_read,
            files_skipped = result.files_skipped,
            observations = result.observations.len(),
            "Range query complete"
        );
    }

    Ok(result)
}

/// Range query over the trailing seven days.
pub fn latest_week(config: &QueryConfig, campaign: Campaign) -> Result<RangeQueryResult> {
    let end = Utc::now();
    let start = end - chrono::Duration::days(7);
    range_query(config, campaign, start, end)
}

/// Read one archive on a helper thread, abandoning it at the deadline.
///
/// A stuck or corrupt file then costs one leaked thread instead of
/// stalling the whole query.
fn read_with_timeout(
    file: &ArchiveFile,
    campaign: Campaign,
    timeout: Duration,
) -> Result<RadarFile> {
    let (tx, rx) = mpsc::channel();
    let path = file.path.clone();
    let base = file.base_datetime();

    thread::Builder::new()
        .name("crs-read".to_string())
        .spawn(move || {
            let _ = tx.send(read_archive(&path, campaign, Some(base)));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(ReaderError::Timeout {
            path: file.path.display().to_string(),
            seconds: timeout.as_secs(),
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ReaderError::Other(anyhow::anyhow!(
            "reader thread terminated without a result for {}",
            file.path.display()
        ))),
    }
}
