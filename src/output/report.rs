//! Crawl report generation
//!
//! This module turns a crawl snapshot into the analytics the crawl exists to
//! answer and prints them to stdout.

use crate::state::CrawlSnapshot;
use chrono::{DateTime, Utc};

/// Default number of words listed in a report
pub const DEFAULT_TOP_WORDS: usize = 50;

/// Crawl analytics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Number of distinct pages recorded
    pub unique_pages: usize,

    /// Longest page by word count
    pub longest_page: Option<(String, u64)>,

    /// Most frequent words, most common first
    pub top_words: Vec<(String, u64)>,

    /// Pages per subdomain, ordered by host
    pub subdomains: Vec<(String, u64)>,

    /// URLs whose analysis started
    pub seen_urls: usize,

    /// Distinct content fingerprints
    pub fingerprints: usize,
}

impl CrawlReport {
    /// Builds a report listing the `top_n` most frequent words
    pub fn from_snapshot(snapshot: &CrawlSnapshot, top_n: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            unique_pages: snapshot.unique_pages(),
            longest_page: snapshot
                .longest_page()
                .map(|(url, words)| (url.to_string(), words)),
            top_words: snapshot.top_words(top_n),
            subdomains: snapshot.subdomains(),
            seen_urls: snapshot.seen_urls.len(),
            fingerprints: snapshot.content_fingerprints.len(),
        }
    }

    /// Seen URLs that never made it into the page records
    pub fn skipped_urls(&self) -> usize {
        self.seen_urls.saturating_sub(self.unique_pages)
    }
}

/// Prints a report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Unique pages: {}", report.unique_pages);
    println!("  URLs seen: {}", report.seen_urls);
    println!("  Skipped after fetch: {}", report.skipped_urls());
    println!("  Content fingerprints: {}", report.fingerprints);
    println!();

    match &report.longest_page {
        Some((url, words)) => println!("Longest page: {} ({} words)", url, words),
        None => println!("Longest page: none recorded"),
    }
    println!();

    if !report.top_words.is_empty() {
        println!("Top {} Words:", report.top_words.len());
        for (rank, (word, count)) in report.top_words.iter().enumerate() {
            println!("  {:>3}. {} ({})", rank + 1, word, count);
        }
        println!();
    }

    if !report.subdomains.is_empty() {
        println!("Subdomains ({}):", report.subdomains.len());
        for (host, count) in &report.subdomains {
            let percentage = if report.unique_pages > 0 {
                (*count as f64 / report.unique_pages as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}, {} ({:.1}%)", host, count, percentage);
        }
    }
}
