//! Per-page crawl pipeline
//!
//! The [`Crawler`] takes one fetched page and:
//! - Parses the document once
//! - Extracts outbound links and keeps the crawlable ones
//! - Analyzes the page content into the shared crawl statistics

use crate::analysis::{AnalysisOutcome, ContentAnalyzer};
use crate::config::Config;
use crate::crawler::extractor::extract_links_lenient;
use crate::crawler::fetcher::FetchResult;
use crate::crawler::parser::Document;
use crate::state::StatsStore;
use crate::url::{canonicalize, CanonicalUrl, PolicyFilter};
use crate::Result;
use std::sync::Arc;

/// Everything the pipeline produced for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPage {
    /// Crawlable outbound links, in first-occurrence order
    pub links: Vec<CanonicalUrl>,

    /// Links found on the page but rejected by the policy filter
    pub rejected: usize,

    /// Outcome of content analysis; `None` if the page URL does not canonicalize
    pub analysis: Option<AnalysisOutcome>,
}

/// Link extraction, filtering and content analysis for fetched pages
///
/// A `Crawler` is shared by every worker; all mutable state lives in the
/// [`StatsStore`].
pub struct Crawler {
    policy: PolicyFilter,
    analyzer: ContentAnalyzer,
    stats: Arc<StatsStore>,
}

impl Crawler {
    /// Creates a crawler that records into `stats`
    pub fn new(config: Config, stats: Arc<StatsStore>) -> Self {
        Self {
            policy: PolicyFilter::new(&config.policy),
            analyzer: ContentAnalyzer::new(&config.content),
            stats,
        }
    }

    /// Creates a crawler whose stats store is opened from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to process pages
    /// * `Err(CrawlError)` - The snapshot backend could not be opened
    pub fn from_config(config: Config) -> Result<Self> {
        let stats = StatsStore::from_config(&config.persistence)?;
        Ok(Self::new(config, Arc::new(stats)))
    }

    /// Processes a fetched page and returns the links to crawl next
    pub fn process(&self, url: &str, fetch: &FetchResult) -> Vec<CanonicalUrl> {
        self.process_page(url, fetch).links
    }

    /// Processes a fetched page, reporting everything that happened
    pub fn process_page(&self, url: &str, fetch: &FetchResult) -> ProcessedPage {
        let document = Document::parse(fetch.body().unwrap_or_default());

        let found = extract_links_lenient(url, fetch, &document);
        let total = found.len();
        let links: Vec<CanonicalUrl> = found
            .into_iter()
            .filter(|link| {
                let verdict = self.policy.evaluate(link.as_str());
                if let Some(reason) = verdict.reason() {
                    tracing::debug!("Rejected {}: {}", link, reason);
                }
                verdict.is_crawlable()
            })
            .collect();

        let analysis = match canonicalize(url) {
            Ok(canonical) => Some(self.analyzer.analyze(&canonical, fetch, &document, &self.stats)),
            Err(e) => {
                tracing::debug!("Not analyzing {}: {}", url, e);
                None
            }
        };

        ProcessedPage {
            rejected: total - links.len(),
            links,
            analysis,
        }
    }

    pub fn stats(&self) -> &Arc<StatsStore> {
        &self.stats
    }
}
