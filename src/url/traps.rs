//! Crawler trap patterns
//!
//! Traps are URL spaces that generate unbounded link sequences: calendar
//! navigation, wiki revision and action endpoints, login redirects and
//! date-stamped archives. Each pattern is plain data paired with the reason it
//! is rejected, so the table can be extended from configuration.

#![allow(clippy::expect_used)]

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Matches `YYYY-MM` or `YYYY/MM` stamps anywhere in a path
static DATE_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)(?:19|20)\d{2}[-/](?:0[1-9]|1[0-2])(?:[-/]|$)")
        .expect("DATE_STAMP regex")
});

/// A single URL shape that identifies a trap
///
/// Segment, key and value comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TrapPattern {
    /// A segment from `roots` followed later in the path by one of `segments`
    SegmentUnderRoot {
        roots: Vec<String>,
        segments: Vec<String>,
    },

    /// Any path segment equal to one of `segments`
    Segment { segments: Vec<String> },

    /// The path contains `needle` anywhere
    PathContains { needle: String },

    /// A query key equal to `key`; when `values` is non-empty the value must
    /// be one of them
    QueryKey {
        key: String,
        #[serde(default)]
        values: Vec<String>,
    },

    /// A query key equal to `key` on a path with a `segment` segment
    QueryKeyUnderSegment { segment: String, key: String },

    /// A query key starting with `prefix`
    QueryKeyPrefix { prefix: String },

    /// A query key containing `needle`
    QueryKeyContains { needle: String },

    /// A `YYYY-MM` or `YYYY/MM` stamp in the path
    DateStamp,
}

/// A trap pattern with the reason reported on rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapRule {
    pub pattern: TrapPattern,
    pub reason: String,
}

impl TrapRule {
    pub fn new(pattern: TrapPattern, reason: &str) -> Self {
        Self {
            pattern,
            reason: reason.to_string(),
        }
    }
}

/// Lowercased pieces of a URL that trap patterns inspect
#[derive(Debug, Clone, Default)]
pub struct UrlShape {
    pub path: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl UrlShape {
    pub fn from_url(url: &url::Url) -> Self {
        let path = url.path().to_lowercase();
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
            .collect();

        Self {
            path,
            segments,
            query,
        }
    }
}

fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|h| h.eq_ignore_ascii_case(needle))
}

impl TrapPattern {
    /// Returns true if the URL shape falls into this trap
    pub fn matches(&self, shape: &UrlShape) -> bool {
        match self {
            Self::SegmentUnderRoot { roots, segments } => shape
                .segments
                .iter()
                .position(|s| contains_ignore_case(roots, s))
                .is_some_and(|root| {
                    shape.segments[root + 1..]
                        .iter()
                        .any(|s| contains_ignore_case(segments, s))
                }),
            Self::Segment { segments } => shape
                .segments
                .iter()
                .any(|s| contains_ignore_case(segments, s)),
            Self::PathContains { needle } => shape.path.contains(&needle.to_lowercase()),
            Self::QueryKey { key, values } => shape.query.iter().any(|(k, v)| {
                k.eq_ignore_ascii_case(key) && (values.is_empty() || contains_ignore_case(values, v))
            }),
            Self::QueryKeyUnderSegment { segment, key } => {
                shape.segments.iter().any(|s| s.eq_ignore_ascii_case(segment))
                    && shape.query.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
            }
            Self::QueryKeyPrefix { prefix } => {
                let prefix = prefix.to_lowercase();
                shape.query.iter().any(|(k, _)| k.starts_with(&prefix))
            }
            Self::QueryKeyContains { needle } => {
                let needle = needle.to_lowercase();
                shape.query.iter().any(|(k, _)| k.contains(&needle))
            }
            Self::DateStamp => DATE_STAMP.is_match(&shape.path),
        }
    }
}

/// Returns the first rule whose pattern matches the shape
pub fn find_trap<'a>(rules: &'a [TrapRule], shape: &UrlShape) -> Option<&'a TrapRule> {
    rules.iter().find(|rule| rule.pattern.matches(shape))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in trap table
pub fn default_trap_rules() -> Vec<TrapRule> {
    vec![
        TrapRule::new(
            TrapPattern::SegmentUnderRoot {
                roots: strings(&["events", "event"]),
                segments: strings(&[
                    "event", "events", "week", "month", "day", "list", "tag", "category",
                    "today", "photo", "map",
                ]),
            },
            "calendar event listing",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "ical".to_string(),
                values: strings(&["1"]),
            },
            "calendar export",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "outlook-ical".to_string(),
                values: Vec::new(),
            },
            "calendar export",
        ),
        TrapRule::new(
            TrapPattern::QueryKeyPrefix {
                prefix: "tribe".to_string(),
            },
            "calendar navigation",
        ),
        TrapRule::new(
            TrapPattern::QueryKeyContains {
                needle: "bar-date".to_string(),
            },
            "calendar date picker",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "eventdisplay".to_string(),
                values: Vec::new(),
            },
            "calendar view",
        ),
        TrapRule::new(
            TrapPattern::PathContains {
                needle: "doku.php".to_string(),
            },
            "wiki page endpoint",
        ),
        TrapRule::new(
            TrapPattern::PathContains {
                needle: "fetch.php".to_string(),
            },
            "wiki file fetch",
        ),
        TrapRule::new(
            TrapPattern::Segment {
                segments: strings(&["login", "wp-login.php"]),
            },
            "login page",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "do".to_string(),
                values: strings(&[
                    "diff", "revisions", "edit", "login", "backlink", "media", "index", "recent",
                ]),
            },
            "wiki action",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "action".to_string(),
                values: strings(&["diff", "history", "edit", "login", "raw"]),
            },
            "wiki action",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "rev".to_string(),
                values: Vec::new(),
            },
            "revision view",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "version".to_string(),
                values: Vec::new(),
            },
            "version view",
        ),
        TrapRule::new(
            TrapPattern::QueryKey {
                key: "difftype".to_string(),
                values: Vec::new(),
            },
            "diff view",
        ),
        TrapRule::new(
            TrapPattern::QueryKeyUnderSegment {
                segment: "timeline".to_string(),
                key: "from".to_string(),
            },
            "timeline window",
        ),
        TrapRule::new(
            TrapPattern::Segment {
                segments: strings(&["timeline"]),
            },
            "changeset timeline",
        ),
        TrapRule::new(TrapPattern::DateStamp, "date-stamped archive"),
    ]
}
