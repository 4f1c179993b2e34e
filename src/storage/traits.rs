//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::state::CrawlSnapshot;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A place where crawl snapshots are saved and restored
///
/// Implementations must be usable from several worker threads at once.
pub trait SnapshotStore: Send + Sync {
    /// Loads the last saved snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(Some(snapshot))` - A snapshot was saved earlier
    /// * `Ok(None)` - Nothing has been saved yet
    /// * `Err(StorageError)` - The stored data is unreadable
    fn load(&self) -> StorageResult<Option<CrawlSnapshot>>;

    /// Replaces the stored snapshot with `snapshot`
    fn save(&self, snapshot: &CrawlSnapshot) -> StorageResult<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}
