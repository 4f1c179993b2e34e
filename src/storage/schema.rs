//! Database schema for the SQLite snapshot backend
//!
//! One table per crawl aggregate plus a key/value `snapshot_meta` table for
//! the longest-page pointer and the save timestamp.

/// SQL schema for the snapshot database
pub const SCHEMA_SQL: &str = r#"
-- URLs whose analysis has started
CREATE TABLE IF NOT EXISTS seen_urls (
    url TEXT PRIMARY KEY
);

-- Word count of every recorded page
CREATE TABLE IF NOT EXISTS page_word_counts (
    url TEXT PRIMARY KEY,
    word_count INTEGER NOT NULL
);

-- Cumulative word frequencies
CREATE TABLE IF NOT EXISTS word_frequencies (
    word TEXT PRIMARY KEY,
    count INTEGER NOT NULL
);

-- Recorded pages per host
CREATE TABLE IF NOT EXISTS subdomain_page_counts (
    host TEXT PRIMARY KEY,
    page_count INTEGER NOT NULL
);

-- Content fingerprints of recorded pages
CREATE TABLE IF NOT EXISTS content_fingerprints (
    fingerprint TEXT PRIMARY KEY
);

-- Scalar snapshot fields
CREATE TABLE IF NOT EXISTS snapshot_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Tables cleared and refilled on every save
pub const AGGREGATE_TABLES: &[&str] = &[
    "seen_urls",
    "page_word_counts",
    "word_frequencies",
    "subdomain_page_counts",
    "content_fingerprints",
    "snapshot_meta",
];

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
