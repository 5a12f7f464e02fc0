//! Runtime configuration for Treemarks.
//!
//! Read from the environment:
//! - `TREEMARKS_DATA_DIR`: directory holding `treemarks.db`
//!   (default: [`platform::get_data_dir`]).
//! - `TREEMARKS_HISTORY_CAPACITY`: number of undo records kept
//!   (default: [`HISTORY_CAPACITY`]; zero or unparsable values fall back to it).

use std::path::PathBuf;

use crate::managers::transaction_log::HISTORY_CAPACITY;
use crate::platform;

pub const DATA_DIR_ENV: &str = "TREEMARKS_DATA_DIR";
pub const HISTORY_CAPACITY_ENV: &str = "TREEMARKS_HISTORY_CAPACITY";
pub const DB_FILE_NAME: &str = "treemarks.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub history_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: platform::get_data_dir(),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(capacity) = lookup(HISTORY_CAPACITY_ENV)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&c| c > 0)
        {
            config.history_capacity = capacity;
        }
        config
    }

    /// Config rooted at `data_dir` with default history capacity.
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            history_capacity: HISTORY_CAPACITY,
        }
    }

    /// Full path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
