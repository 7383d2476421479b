//! Configuration for multi-file range queries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for [`range_query`](crate::range_query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Directory holding the campaign archives.
    pub data_dir: PathBuf,

    /// Upper bound on concurrent file reads.
    pub max_parallel_reads: usize,

    /// Per-file read deadline in seconds. A file that exceeds it is
    /// skipped; it does not block sibling reads.
    pub read_timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/crs"),
            max_parallel_reads: 4,
            read_timeout_secs: 120,
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CRS_DATA_DIR") {
            config.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CRS_MAX_PARALLEL_READS") {
            if let Ok(n) = val.parse() {
                config.max_parallel_reads = n;
            }
        }

        if let Ok(val) = std::env::var("CRS_READ_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.read_timeout_secs = secs;
            }
        }

        config
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
