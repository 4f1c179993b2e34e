//! The stats store: sole owner of crawl aggregates
//!
//! All reads and writes of crawl statistics go through [`StatsStore`]. Every
//! check-then-act sequence (seen URL, content fingerprint, longest page) runs
//! under one lock, and the lock is never held across snapshot I/O.

use crate::analysis::Fingerprint;
use crate::config::PersistenceConfig;
use crate::state::snapshot::CrawlSnapshot;
use crate::storage::{open_snapshot_store, SnapshotStore, StorageResult};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Default minimum time between throttled flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(2);

/// Everything measured about a page that passed content checks
#[derive(Debug, Clone)]
pub struct PageMeasurement {
    /// Canonical URL of the page
    pub url: String,

    /// Host to credit in subdomain counts, if within the top-level domain
    pub subdomain: Option<String>,

    /// Number of tokens on the page
    pub word_count: u64,

    /// Fingerprint of the normalized visible text
    pub fingerprint: Fingerprint,

    /// Occurrences of each non-stop word on the page
    pub word_frequencies: Vec<(String, u64)>,
}

/// Result of trying to record a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The page was added to every aggregate
    Recorded,
    /// A page with the same URL was recorded earlier
    AlreadyRecorded,
    /// A page with the same content fingerprint was recorded earlier
    DuplicateContent,
}

/// Thread-safe owner of crawl statistics with throttled persistence
pub struct StatsStore {
    state: Mutex<CrawlSnapshot>,
    backend: Option<Box<dyn SnapshotStore>>,
    flush_interval: Duration,
    last_flush: Mutex<Option<Instant>>,
    write_lock: Mutex<()>,
}

impl StatsStore {
    /// Creates a store that loads from and flushes to `backend`
    ///
    /// A missing or unreadable snapshot starts the store empty.
    pub fn open(backend: Box<dyn SnapshotStore>, flush_interval: Duration) -> Self {
        let state = match backend.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    "Loaded snapshot from {}: {} pages, {} seen URLs",
                    backend.describe(),
                    snapshot.unique_pages(),
                    snapshot.seen_urls.len()
                );
                snapshot
            }
            Ok(None) => {
                tracing::info!("No snapshot at {}, starting empty", backend.describe());
                CrawlSnapshot::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable snapshot at {}: {}",
                    backend.describe(),
                    e
                );
                CrawlSnapshot::new()
            }
        };

        Self {
            state: Mutex::new(state),
            backend: Some(backend),
            flush_interval,
            last_flush: Mutex::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the backend named by the persistence configuration
    pub fn from_config(config: &PersistenceConfig) -> StorageResult<Self> {
        let backend = open_snapshot_store(config)?;
        Ok(Self::open(
            backend,
            Duration::from_millis(config.flush_interval_ms),
        ))
    }

    /// Creates a store without persistence
    pub fn in_memory() -> Self {
        Self::with_snapshot(CrawlSnapshot::new())
    }

    /// Creates a store without persistence, seeded with `snapshot`
    pub fn with_snapshot(snapshot: CrawlSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            backend: None,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            last_flush: Mutex::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Marks a URL as seen; returns true if it was not seen before
    pub fn mark_seen(&self, url: &str) -> bool {
        self.state.lock().seen_urls.insert(url.to_string())
    }

    pub fn is_seen(&self, url: &str) -> bool {
        self.state.lock().seen_urls.contains(url)
    }

    /// Adds a measured page to every aggregate, atomically
    ///
    /// The first page recorded for a URL or fingerprint wins. The longest page
    /// only changes when the new word count is strictly greater.
    pub fn record_page(&self, page: PageMeasurement) -> RecordOutcome {
        let mut state = self.state.lock();

        if state.page_word_counts.contains_key(&page.url) {
            return RecordOutcome::AlreadyRecorded;
        }

        if !state
            .content_fingerprints
            .insert(page.fingerprint.into_hex())
        {
            return RecordOutcome::DuplicateContent;
        }

        state.seen_urls.insert(page.url.clone());
        state
            .page_word_counts
            .insert(page.url.clone(), page.word_count);

        if state.longest_page_url.is_none() || page.word_count > state.longest_page_words {
            state.longest_page_url = Some(page.url);
            state.longest_page_words = page.word_count;
        }

        for (word, count) in page.word_frequencies {
            *state.word_frequencies.entry(word).or_insert(0) += count;
        }

        if let Some(host) = page.subdomain {
            *state.subdomain_page_counts.entry(host).or_insert(0) += 1;
        }

        RecordOutcome::Recorded
    }

    /// Flushes if the throttle interval has elapsed since the last attempt
    ///
    /// Write failures are logged and leave in-memory state untouched; the
    /// next attempt happens after another interval. Returns true if a
    /// snapshot was written.
    pub fn maybe_flush(&self) -> bool {
        if self.backend.is_none() {
            return false;
        }

        {
            let mut last = self.last_flush.lock();
            let now = Instant::now();
            if let Some(previous) = *last {
                if now.duration_since(previous) < self.flush_interval {
                    return false;
                }
            }
            *last = Some(now);
        }

        match self.flush() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Stats not saved this interval: {}", e);
                false
            }
        }
    }

    /// Writes the current state to the backend immediately
    pub fn flush(&self) -> StorageResult<()> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        // Serialize writers so an older snapshot never overwrites a newer one
        let _writer = self.write_lock.lock();
        let snapshot = self.snapshot();
        backend.save(&snapshot)?;

        tracing::debug!(
            "Flushed snapshot to {} ({} pages)",
            backend.describe(),
            snapshot.unique_pages()
        );
        Ok(())
    }

    /// Clears every aggregate
    pub fn reset(&self) {
        *self.state.lock() = CrawlSnapshot::new();
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> CrawlSnapshot {
        self.state.lock().clone()
    }

    pub fn unique_pages(&self) -> usize {
        self.state.lock().unique_pages()
    }

    pub fn seen_count(&self) -> usize {
        self.state.lock().seen_urls.len()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.state.lock().content_fingerprints.len()
    }

    pub fn page_word_count(&self, url: &str) -> Option<u64> {
        self.state.lock().page_word_counts.get(url).copied()
    }

    pub fn longest_page(&self) -> Option<(String, u64)> {
        self.state
            .lock()
            .longest_page()
            .map(|(url, words)| (url.to_string(), words))
    }

    pub fn top_words(&self, n: usize) -> Vec<(String, u64)> {
        self.state.lock().top_words(n)
    }

    pub fn word_frequency(&self, word: &str) -> u64 {
        self.state
            .lock()
            .word_frequencies
            .get(word)
            .copied()
            .unwrap_or(0)
    }

    pub fn subdomain_counts(&self) -> Vec<(String, u64)> {
        self.state.lock().subdomains()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn measurement(url: &str, text: &str, words: u64) -> PageMeasurement {
        PageMeasurement {
            url: url.to_string(),
            subdomain: Some("ics.uci.edu".to_string()),
            word_count: words,
            fingerprint: Fingerprint::of(text),
            word_frequencies: vec![("crawler".to_string(), 2), ("index".to_string(), 1)],
        }
    }

    #[test]
    fn test_mark_seen_is_test_and_set() {
        let store = StatsStore::in_memory();
        assert!(store.mark_seen("https://ics.uci.edu/a"));
        assert!(!store.mark_seen("https://ics.uci.edu/a"));
        assert!(store.is_seen("https://ics.uci.edu/a"));
        assert_eq!(store.seen_count(), 1);
    }

    #[test]
    fn test_record_page_updates_aggregates() {
        let store = StatsStore::in_memory();
        let outcome = store.record_page(measurement("https://ics.uci.edu/a", "text a", 150));

        assert_eq!(outcome, RecordOutcome::Recorded);
        assert_eq!(store.unique_pages(), 1);
        assert_eq!(store.page_word_count("https://ics.uci.edu/a"), Some(150));
        assert_eq!(
            store.longest_page(),
            Some(("https://ics.uci.edu/a".to_string(), 150))
        );
        assert_eq!(store.word_frequency("crawler"), 2);
        assert_eq!(
            store.subdomain_counts(),
            vec![("ics.uci.edu".to_string(), 1)]
        );
        assert_eq!(store.fingerprint_count(), 1);
    }

    #[test]
    fn test_duplicate_content_rejected() {
        let store = StatsStore::in_memory();
        store.record_page(measurement("https://ics.uci.edu/a", "same text", 150));
        let outcome = store.record_page(measurement("https://ics.uci.edu/b", "same text", 150));

        assert_eq!(outcome, RecordOutcome::DuplicateContent);
        assert_eq!(store.unique_pages(), 1);
        assert_eq!(store.word_frequency("crawler"), 2);
        assert_eq!(store.page_word_count("https://ics.uci.edu/b"), None);
    }

    #[test]
    fn test_first_measurement_wins() {
        let store = StatsStore::in_memory();
        store.record_page(measurement("https://ics.uci.edu/a", "first", 150));
        let outcome = store.record_page(measurement("https://ics.uci.edu/a", "second", 900));

        assert_eq!(outcome, RecordOutcome::AlreadyRecorded);
        assert_eq!(store.page_word_count("https://ics.uci.edu/a"), Some(150));
        assert_eq!(store.fingerprint_count(), 1);
    }

    #[test]
    fn test_longest_page_ties_keep_earlier() {
        let store = StatsStore::in_memory();
        store.record_page(measurement("https://ics.uci.edu/a", "one", 200));
        store.record_page(measurement("https://ics.uci.edu/b", "two", 200));
        assert_eq!(store.longest_page().unwrap().0, "https://ics.uci.edu/a");

        store.record_page(measurement("https://ics.uci.edu/c", "three", 201));
        assert_eq!(store.longest_page().unwrap().0, "https://ics.uci.edu/c");
    }

    #[test]
    fn test_in_memory_flush_is_noop() {
        let store = StatsStore::in_memory();
        assert!(store.flush().is_ok());
        assert!(!store.maybe_flush());
    }

    #[test]
    fn test_reset_clears_state() {
        let store = StatsStore::in_memory();
        store.mark_seen("https://ics.uci.edu/a");
        store.record_page(measurement("https://ics.uci.edu/a", "x", 120));
        store.reset();
        assert!(store.snapshot().is_empty());
    }

    /// Backend that counts saves, failing the first `failures` of them
    struct CountingStore {
        saves: Arc<AtomicUsize>,
        failures: usize,
        saved: Arc<Mutex<Option<CrawlSnapshot>>>,
    }

    impl CountingStore {
        fn new(saves: &Arc<AtomicUsize>, failures: usize) -> Self {
            Self {
                saves: Arc::clone(saves),
                failures,
                saved: Arc::new(Mutex::new(None)),
            }
        }
    }

    impl SnapshotStore for CountingStore {
        fn load(&self) -> StorageResult<Option<CrawlSnapshot>> {
            Ok(None)
        }

        fn save(&self, snapshot: &CrawlSnapshot) -> StorageResult<()> {
            let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(StorageError::Corrupt("disk full".to_string()));
            }
            *self.saved.lock() = Some(snapshot.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "counting store".to_string()
        }
    }

    #[test]
    fn test_maybe_flush_is_throttled() {
        let saves = Arc::new(AtomicUsize::new(0));
        let backend = CountingStore::new(&saves, 0);
        let store = StatsStore::open(Box::new(backend), Duration::from_secs(3600));

        assert!(store.maybe_flush());
        assert!(!store.maybe_flush());
        assert!(!store.maybe_flush());
        assert_eq!(saves.load(Ordering::SeqCst), 1);

        // Explicit flush ignores the throttle
        store.flush().unwrap();
        assert_eq!(saves.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_flush_keeps_state() {
        let saves = Arc::new(AtomicUsize::new(0));
        let backend = CountingStore::new(&saves, usize::MAX);
        let store = StatsStore::open(Box::new(backend), Duration::from_millis(0));
        store.record_page(measurement("https://ics.uci.edu/a", "x", 120));

        assert!(!store.maybe_flush());
        assert!(store.flush().is_err());
        assert_eq!(store.unique_pages(), 1);
        assert_eq!(saves.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_flush_retried_next_window() {
        let saves = Arc::new(AtomicUsize::new(0));
        let backend = CountingStore::new(&saves, 1);
        let saved = Arc::clone(&backend.saved);
        let store = StatsStore::open(Box::new(backend), Duration::from_millis(200));
        store.record_page(measurement("https://ics.uci.edu/a", "x", 120));

        assert!(!store.maybe_flush());
        assert!(!store.maybe_flush());
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert!(saved.lock().is_none());

        std::thread::sleep(Duration::from_millis(250));
        assert!(store.maybe_flush());
        assert_eq!(saves.load(Ordering::SeqCst), 2);

        let written = saved.lock().clone().unwrap();
        assert_eq!(written.unique_pages(), 1);
        assert_eq!(written, store.snapshot());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = StatsStore::open(Box::new(JsonFileStore::new(&path)), DEFAULT_FLUSH_INTERVAL);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_reopen_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let store = StatsStore::open(Box::new(JsonFileStore::new(&path)), DEFAULT_FLUSH_INTERVAL);
        store.mark_seen("https://ics.uci.edu/a");
        store.record_page(measurement("https://ics.uci.edu/a", "x", 120));
        store.flush().unwrap();
        let before = store.snapshot();

        let reopened =
            StatsStore::open(Box::new(JsonFileStore::new(&path)), DEFAULT_FLUSH_INTERVAL);
        assert_eq!(reopened.snapshot(), before);
    }
}
