//! Storage module for persisting crawl snapshots
//!
//! This module provides the snapshot backends behind the stats store:
//! - A pretty-printed JSON file, replaced atomically on every save
//! - A SQLite database with one table per aggregate

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonFileStore;
pub use sqlite::SqliteSnapshotStore;
pub use traits::{SnapshotStore, StorageError, StorageResult};

use crate::config::{PersistenceConfig, StorageBackend};
use std::path::Path;

/// Opens the snapshot backend named by the configuration
///
/// # Arguments
///
/// * `config` - The persistence configuration
///
/// # Returns
///
/// * `Ok(Box<dyn SnapshotStore>)` - The backend, ready to load or save
/// * `Err(StorageError)` - The database could not be opened
pub fn open_snapshot_store(config: &PersistenceConfig) -> StorageResult<Box<dyn SnapshotStore>> {
    let path = Path::new(&config.snapshot_path);
    match config.backend {
        StorageBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StorageBackend::Sqlite => Ok(Box::new(SqliteSnapshotStore::new(path)?)),
    }
}
