//! URL handling module for Scholar-Crawl
//!
//! This module provides URL canonicalization, domain matching, crawler-trap
//! patterns and the crawl eligibility filter built on top of them.

mod domain;
mod matcher;
mod normalize;
mod policy;
mod traps;

// Re-export main functions
pub use domain::subdomain_within;
pub use matcher::{matches_any_domain, matches_domain};
pub use normalize::{canonicalize, canonicalize_parsed, CanonicalUrl, SUPPORTED_SCHEMES};
pub use policy::{PolicyFilter, RejectReason, Verdict};
pub use traps::{default_trap_rules, find_trap, TrapPattern, TrapRule, UrlShape};

/// Canonicalizes a URL and evaluates it in one step
///
/// URLs that fail canonicalization are reported as unparseable.
///
/// # Examples
///
/// ```
/// use scholar_crawl::config::PolicyConfig;
/// use scholar_crawl::url::{check_url, PolicyFilter};
///
/// let filter = PolicyFilter::new(&PolicyConfig::default());
/// let (canonical, verdict) = check_url("HTTP://WWW.ICS.UCI.EDU/about/", &filter);
/// assert_eq!(canonical.unwrap().as_str(), "http://www.ics.uci.edu/about");
/// assert!(verdict.is_crawlable());
/// ```
pub fn check_url(raw: &str, filter: &PolicyFilter) -> (Option<CanonicalUrl>, Verdict) {
    match canonicalize(raw) {
        Ok(canonical) => {
            let verdict = filter.evaluate(canonical.as_str());
            (Some(canonical), verdict)
        }
        Err(_) => (None, Verdict::Reject(RejectReason::Unparseable)),
    }
}
