use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "file.json";

/// Configuration for the snapshot store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the snapshot document lives.
    pub snapshot_path: PathBuf,
    /// `fsync` the temporary file before it replaces the snapshot.
    pub sync_on_save: bool,
    /// Write indented JSON instead of a single line.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            sync_on_save: true,
            pretty: false,
        }
    }
}

impl StoreConfig {
    /// Default settings with the snapshot at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: path.into(),
            ..Default::default()
        }
    }
}
