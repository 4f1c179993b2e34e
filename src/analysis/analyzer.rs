//! Content analysis of fetched pages
//!
//! Each check short-circuits without touching aggregates; a page that passes
//! every check is committed to the [`StatsStore`] in one atomic step.

use crate::analysis::stopwords::stop_word_set;
use crate::analysis::tokenize::{alpha_ratio, is_alphabetic, tokenize, Fingerprint};
use crate::config::ContentConfig;
use crate::crawler::{Document, FetchResult};
use crate::state::{PageMeasurement, RecordOutcome, StatsStore};
use crate::url::{subdomain_within, CanonicalUrl};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a page contributed nothing to the aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BadStatus(Option<u16>),
    NoContent,
    NotHtml,
    AlreadySeen,
    TooFewTokens(usize),
    TooManyTokens(usize),
    LowAlphaRatio,
    DuplicateContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadStatus(Some(status)) => write!(f, "status {}", status),
            Self::BadStatus(None) => write!(f, "no status"),
            Self::NoContent => write!(f, "no content"),
            Self::NotHtml => write!(f, "not HTML"),
            Self::AlreadySeen => write!(f, "already seen"),
            Self::TooFewTokens(n) => write!(f, "too few tokens ({})", n),
            Self::TooManyTokens(n) => write!(f, "too many tokens ({})", n),
            Self::LowAlphaRatio => write!(f, "low alphabetic ratio"),
            Self::DuplicateContent => write!(f, "duplicate content"),
        }
    }
}

/// Result of analyzing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The page was recorded with this many tokens
    Recorded { words: u64 },
    Skipped(SkipReason),
}

impl AnalysisOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Applies content quality checks and records pages that pass
pub struct ContentAnalyzer {
    config: ContentConfig,
    stop_words: HashSet<String>,
}

impl ContentAnalyzer {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            stop_words: stop_word_set(&config.extra_stop_words),
            config: config.clone(),
        }
    }

    /// Analyzes a fetched page and records it in `stats` if it qualifies
    ///
    /// The URL is marked seen once the fetch itself is usable, even when a
    /// later content check skips the page. A recorded page requests a
    /// throttled flush.
    pub fn analyze(
        &self,
        url: &CanonicalUrl,
        fetch: &FetchResult,
        document: &Document,
        stats: &StatsStore,
    ) -> AnalysisOutcome {
        let outcome = self.measure(url, fetch, document, stats);

        match outcome {
            AnalysisOutcome::Recorded { words } => {
                tracing::debug!("Recorded {} ({} words)", url, words);
                stats.maybe_flush();
            }
            AnalysisOutcome::Skipped(reason) => {
                tracing::debug!("Skipped analysis of {}: {}", url, reason);
            }
        }

        outcome
    }

    fn measure(
        &self,
        url: &CanonicalUrl,
        fetch: &FetchResult,
        document: &Document,
        stats: &StatsStore,
    ) -> AnalysisOutcome {
        use AnalysisOutcome::Skipped;

        if !fetch.is_success() {
            return Skipped(SkipReason::BadStatus(fetch.status));
        }
        if fetch.body().is_none() {
            return Skipped(SkipReason::NoContent);
        }
        if !fetch.is_html() {
            return Skipped(SkipReason::NotHtml);
        }

        if !stats.mark_seen(url.as_str()) {
            return Skipped(SkipReason::AlreadySeen);
        }

        let text = document.visible_text();
        let tokens = tokenize(&text);

        if tokens.len() < self.config.min_tokens {
            return Skipped(SkipReason::TooFewTokens(tokens.len()));
        }
        if tokens.len() > self.config.max_tokens {
            return Skipped(SkipReason::TooManyTokens(tokens.len()));
        }

        if alpha_ratio(&text) < self.config.min_alpha_ratio {
            return Skipped(SkipReason::LowAlphaRatio);
        }

        let word_count = tokens.len() as u64;
        let page = PageMeasurement {
            url: url.as_str().to_string(),
            subdomain: url
                .host()
                .and_then(|host| subdomain_within(host, &self.config.top_level_domain))
                .map(str::to_string),
            word_count,
            fingerprint: Fingerprint::of(&text),
            word_frequencies: self.count_words(&tokens),
        };

        match stats.record_page(page) {
            RecordOutcome::Recorded => AnalysisOutcome::Recorded { words: word_count },
            RecordOutcome::AlreadyRecorded => Skipped(SkipReason::AlreadySeen),
            RecordOutcome::DuplicateContent => Skipped(SkipReason::DuplicateContent),
        }
    }

    /// Counts alphabetic tokens that are not stop words
    fn count_words(&self, tokens: &[String]) -> Vec<(String, u64)> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for token in tokens {
            if is_alphabetic(token) && !self.stop_words.contains(token.as_str()) {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(word, count)| (word.to_string(), count))
            .collect()
    }
}
