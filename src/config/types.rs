use crate::url::{default_trap_rules, TrapRule};
use serde::Deserialize;

/// Domains the crawl is restricted to
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "ics.uci.edu",
    "cs.uci.edu",
    "informatics.uci.edu",
    "stat.uci.edu",
];

/// File extensions that never carry crawlable text
pub const DEFAULT_DENIED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpeg", "jpg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx",
    "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar", "gz",
    "svg", "webp", "apk", "img", "war", "odp", "ods", "odt", "ppsx", "bib", "mat", "sql", "xml",
];

/// Main configuration structure for Scholar-Crawl
///
/// Every section falls back to its defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub policy: PolicyConfig,
    pub content: ContentConfig,
    pub persistence: PersistenceConfig,
}

/// Crawl eligibility and trap detection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Domains (and their subdomains) that may be crawled
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// File extensions that are never crawled (without the leading dot)
    #[serde(rename = "denied-extensions")]
    pub denied_extensions: Vec<String>,

    /// Maximum number of non-empty path segments
    #[serde(rename = "max-path-depth")]
    pub max_path_depth: usize,

    /// Maximum occurrences of any single path segment
    #[serde(rename = "max-segment-repeats")]
    pub max_segment_repeats: usize,

    /// Trap patterns checked against path and query
    #[serde(rename = "trap-rules")]
    pub trap_rules: Vec<TrapRule>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_domains: DEFAULT_ALLOWED_DOMAINS.iter().map(|s| s.to_string()).collect(),
            denied_extensions: DEFAULT_DENIED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_path_depth: 10,
            max_segment_repeats: 3,
            trap_rules: default_trap_rules(),
        }
    }
}

/// Content quality thresholds and analytics scope
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Pages with fewer tokens are skipped
    #[serde(rename = "min-tokens")]
    pub min_tokens: usize,

    /// Pages with more tokens are skipped
    #[serde(rename = "max-tokens")]
    pub max_tokens: usize,

    /// Minimum share of alphabetic characters in the visible text
    #[serde(rename = "min-alpha-ratio")]
    pub min_alpha_ratio: f64,

    /// Domain whose hosts are counted in subdomain statistics
    #[serde(rename = "top-level-domain")]
    pub top_level_domain: String,

    /// Stop words excluded in addition to the built-in list
    #[serde(rename = "extra-stop-words")]
    pub extra_stop_words: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_tokens: 100,
            max_tokens: 200_000,
            min_alpha_ratio: 0.6,
            top_level_domain: "uci.edu".to_string(),
            extra_stop_words: Vec::new(),
        }
    }
}

/// Snapshot storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Which backend stores the snapshot
    pub backend: StorageBackend,

    /// Path to the snapshot file
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,

    /// Minimum time between throttled flushes (milliseconds)
    #[serde(rename = "flush-interval-ms")]
    pub flush_interval_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            snapshot_path: "crawl_stats.json".to_string(),
            flush_interval_ms: 2000,
        }
    }
}
