//! Crawl eligibility decisions
//!
//! [`PolicyFilter`] is a pure predicate over canonical URLs. It holds only
//! configuration and never touches crawl state, so one instance can be shared
//! by any number of workers.

use crate::config::PolicyConfig;
use crate::url::matcher::matches_any_domain;
use crate::url::normalize::SUPPORTED_SCHEMES;
use crate::url::traps::{find_trap, TrapRule, UrlShape};
use std::collections::{HashMap, HashSet};
use std::fmt;
use url::Url;

/// Why a URL is not eligible for crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The URL could not be parsed
    Unparseable,
    /// The scheme is not http or https
    Scheme(String),
    /// The host is outside every allowed domain
    Domain(String),
    /// The path ends in a denied file extension
    Extension(String),
    /// The URL matches a trap pattern
    Trap(String),
    /// The path has more segments than allowed
    TooDeep(usize),
    /// A path segment repeats more often than allowed
    RepeatedSegment(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable => write!(f, "unparseable URL"),
            Self::Scheme(s) => write!(f, "unsupported scheme '{}'", s),
            Self::Domain(h) => write!(f, "host '{}' outside allowed domains", h),
            Self::Extension(e) => write!(f, "denied extension '.{}'", e),
            Self::Trap(reason) => write!(f, "trap: {}", reason),
            Self::TooDeep(depth) => write!(f, "path depth {} exceeds limit", depth),
            Self::RepeatedSegment(s) => write!(f, "segment '{}' repeats too often", s),
        }
    }
}

/// Outcome of evaluating a URL against the crawl policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Crawl,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_crawlable(&self) -> bool {
        matches!(self, Self::Crawl)
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Crawl => None,
            Self::Reject(reason) => Some(reason),
        }
    }
}

/// Decides whether canonical URLs may be crawled
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    allowed_domains: Vec<String>,
    denied_extensions: HashSet<String>,
    trap_rules: Vec<TrapRule>,
    max_path_depth: usize,
    max_segment_repeats: usize,
}

impl PolicyFilter {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            denied_extensions: config
                .denied_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            trap_rules: config.trap_rules.clone(),
            max_path_depth: config.max_path_depth,
            max_segment_repeats: config.max_segment_repeats,
        }
    }

    /// Evaluates a URL against every policy check
    ///
    /// # Checks
    ///
    /// 1. Scheme is http or https
    /// 2. Host is within an allowed domain
    /// 3. Final path segment has no denied extension
    /// 4. Path and query match no trap rule
    /// 5. Path depth is within bounds
    /// 6. No path segment repeats too often
    ///
    /// The first failing check determines the reason.
    pub fn evaluate(&self, url: &str) -> Verdict {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return Verdict::Reject(RejectReason::Unparseable),
        };

        match self.check(&parsed) {
            Ok(()) => Verdict::Crawl,
            Err(reason) => Verdict::Reject(reason),
        }
    }

    /// Returns true if the URL passes every policy check
    pub fn is_crawlable(&self, url: &str) -> bool {
        self.evaluate(url).is_crawlable()
    }

    fn check(&self, url: &Url) -> Result<(), RejectReason> {
        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(RejectReason::Scheme(url.scheme().to_string()));
        }

        let host = url.host_str().unwrap_or_default().to_lowercase();
        if !matches_any_domain(&self.allowed_domains, &host) {
            return Err(RejectReason::Domain(host));
        }

        let shape = UrlShape::from_url(url);

        if let Some(ext) = final_extension(&shape.segments) {
            if self.denied_extensions.contains(ext) {
                return Err(RejectReason::Extension(ext.to_string()));
            }
        }

        if let Some(rule) = find_trap(&self.trap_rules, &shape) {
            return Err(RejectReason::Trap(rule.reason.clone()));
        }

        if shape.segments.len() > self.max_path_depth {
            return Err(RejectReason::TooDeep(shape.segments.len()));
        }

        if let Some(segment) = over_repeated_segment(&shape.segments, self.max_segment_repeats) {
            return Err(RejectReason::RepeatedSegment(segment.to_string()));
        }

        Ok(())
    }
}

/// Returns the last dot-delimited suffix of the final segment
fn final_extension(segments: &[String]) -> Option<&str> {
    let last = segments.last()?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Returns a segment occurring more than `max_repeats` times
fn over_repeated_segment(segments: &[String], max_repeats: usize) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for segment in segments {
        let count = counts.entry(segment.as_str()).or_insert(0);
        *count += 1;
        if *count > max_repeats {
            return Some(segment.as_str());
        }
    }
    None
}
