use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every aggregate the crawl accumulates, in serializable form
///
/// This is both the in-memory state owned by [`StatsStore`](super::StatsStore)
/// and the record written by snapshot backends. Missing fields deserialize to
/// their empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSnapshot {
    /// Canonical URLs whose analysis has started
    pub seen_urls: BTreeSet<String>,

    /// Word count of every recorded page, keyed by canonical URL
    pub page_word_counts: BTreeMap<String, u64>,

    /// Page with the highest word count
    pub longest_page_url: Option<String>,

    /// Word count of `longest_page_url`
    pub longest_page_words: u64,

    /// Cumulative occurrences of every non-stop word
    pub word_frequencies: BTreeMap<String, u64>,

    /// Recorded pages per host within the top-level domain
    pub subdomain_page_counts: BTreeMap<String, u64>,

    /// Hex fingerprints of recorded page texts
    pub content_fingerprints: BTreeSet<String>,
}

impl CrawlSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing has been seen or recorded
    pub fn is_empty(&self) -> bool {
        self.seen_urls.is_empty()
            && self.page_word_counts.is_empty()
            && self.longest_page_url.is_none()
            && self.word_frequencies.is_empty()
            && self.subdomain_page_counts.is_empty()
            && self.content_fingerprints.is_empty()
    }

    /// Number of distinct pages recorded
    pub fn unique_pages(&self) -> usize {
        self.page_word_counts.len()
    }

    /// The longest page and its word count
    pub fn longest_page(&self) -> Option<(&str, u64)> {
        self.longest_page_url
            .as_deref()
            .map(|url| (url, self.longest_page_words))
    }

    /// The `n` most frequent words, ties broken alphabetically
    pub fn top_words(&self, n: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(&String, &u64)> = self.word_frequencies.iter().collect();
        words.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        words
            .into_iter()
            .take(n)
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// Subdomain page counts ordered by host name
    pub fn subdomains(&self) -> Vec<(String, u64)> {
        self.subdomain_page_counts
            .iter()
            .map(|(h, c)| (h.clone(), *c))
            .collect()
    }
}
