//! JSON file snapshot backend

use crate::state::CrawlSnapshot;
use crate::storage::traits::{SnapshotStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    #[serde(rename = "saved-at")]
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    snapshot: &'a CrawlSnapshot,
}

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(rename = "saved-at", default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    snapshot: CrawlSnapshot,
}

/// Stores the snapshot as a pretty-printed JSON object
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> StorageResult<Option<CrawlSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Err(StorageError::Corrupt(format!(
                "{} is empty",
                self.path.display()
            )));
        }

        let file: SnapshotFile = serde_json::from_str(&contents)?;
        if let Some(saved_at) = file.saved_at {
            tracing::debug!("Snapshot {} saved at {}", self.path.display(), saved_at);
        }
        Ok(Some(file.snapshot))
    }

    fn save(&self, snapshot: &CrawlSnapshot) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&SnapshotFileRef {
            saved_at: Utc::now(),
            snapshot,
        })?;

        // Write atomically using temp file
        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(temp_path, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
