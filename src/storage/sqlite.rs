//! SQLite snapshot backend
//!
//! Each aggregate lives in its own table. A save replaces every row inside a
//! single transaction, so readers see either the previous or the new snapshot.

use crate::state::CrawlSnapshot;
use crate::storage::schema::{initialize_schema, AGGREGATE_TABLES};
use crate::storage::traits::{SnapshotStore, StorageError, StorageResult};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const SAVED_AT_KEY: &str = "saved_at";
const LONGEST_URL_KEY: &str = "longest_page_url";
const LONGEST_WORDS_KEY: &str = "longest_page_words";

/// SQLite snapshot backend
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteSnapshotStore {
    /// Opens (or creates) a snapshot database
    ///
    /// The schema is created on first load or save, so a file that is not a
    /// database is reported by `load` rather than here. Missing parent
    /// directories are created.
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: path.display().to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: ":memory:".to_string(),
        })
    }
}

fn to_db_count(value: u64) -> StorageResult<i64> {
    i64::try_from(value)
        .map_err(|_| StorageError::Corrupt(format!("count {} does not fit in SQLite", value)))
}

fn from_db_count(value: i64) -> StorageResult<u64> {
    u64::try_from(value).map_err(|_| StorageError::Corrupt(format!("negative count {}", value)))
}

fn load_set(conn: &Connection, sql: &str) -> StorageResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let values = rows.collect::<Result<BTreeSet<_>, _>>()?;
    Ok(values)
}

fn load_counts(conn: &Connection, sql: &str) -> StorageResult<BTreeMap<String, u64>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row?;
        counts.insert(key, from_db_count(count)?);
    }
    Ok(counts)
}

fn get_meta(conn: &Connection, key: &str) -> StorageResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM snapshot_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?)
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> StorageResult<Option<CrawlSnapshot>> {
        let conn = self.conn.lock();
        initialize_schema(&conn)?;

        if get_meta(&conn, SAVED_AT_KEY)?.is_none() {
            return Ok(None);
        }

        let longest_page_words = match get_meta(&conn, LONGEST_WORDS_KEY)? {
            Some(words) => words
                .parse::<u64>()
                .map_err(|_| StorageError::Corrupt(format!("longest page words '{}'", words)))?,
            None => 0,
        };

        Ok(Some(CrawlSnapshot {
            seen_urls: load_set(&conn, "SELECT url FROM seen_urls")?,
            page_word_counts: load_counts(&conn, "SELECT url, word_count FROM page_word_counts")?,
            longest_page_url: get_meta(&conn, LONGEST_URL_KEY)?,
            longest_page_words,
            word_frequencies: load_counts(&conn, "SELECT word, count FROM word_frequencies")?,
            subdomain_page_counts: load_counts(
                &conn,
                "SELECT host, page_count FROM subdomain_page_counts",
            )?,
            content_fingerprints: load_set(&conn, "SELECT fingerprint FROM content_fingerprints")?,
        }))
    }

    fn save(&self, snapshot: &CrawlSnapshot) -> StorageResult<()> {
        let mut conn = self.conn.lock();
        initialize_schema(&conn)?;

        let tx = conn.transaction()?;
        for table in AGGREGATE_TABLES {
            tx.execute(&format!("DELETE FROM {}", table), [])?;
        }

        {
            let mut stmt = tx.prepare("INSERT INTO seen_urls (url) VALUES (?1)")?;
            for url in &snapshot.seen_urls {
                stmt.execute(params![url])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO page_word_counts (url, word_count) VALUES (?1, ?2)")?;
            for (url, words) in &snapshot.page_word_counts {
                stmt.execute(params![url, to_db_count(*words)?])?;
            }

            let mut stmt = tx.prepare("INSERT INTO word_frequencies (word, count) VALUES (?1, ?2)")?;
            for (word, count) in &snapshot.word_frequencies {
                stmt.execute(params![word, to_db_count(*count)?])?;
            }

            let mut stmt = tx
                .prepare("INSERT INTO subdomain_page_counts (host, page_count) VALUES (?1, ?2)")?;
            for (host, count) in &snapshot.subdomain_page_counts {
                stmt.execute(params![host, to_db_count(*count)?])?;
            }

            let mut stmt = tx.prepare("INSERT INTO content_fingerprints (fingerprint) VALUES (?1)")?;
            for fingerprint in &snapshot.content_fingerprints {
                stmt.execute(params![fingerprint])?;
            }

            let mut stmt = tx.prepare("INSERT INTO snapshot_meta (key, value) VALUES (?1, ?2)")?;
            if let Some(url) = &snapshot.longest_page_url {
                stmt.execute(params![LONGEST_URL_KEY, url])?;
            }
            stmt.execute(params![
                LONGEST_WORDS_KEY,
                snapshot.longest_page_words.to_string()
            ])?;
            stmt.execute(params![SAVED_AT_KEY, Utc::now().to_rfc3339()])?;
        }

        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}
