//! Outbound link extraction
//!
//! Links are resolved against the effective URL of the fetch, stripped of
//! fragments, canonicalized and de-duplicated keeping the first occurrence.

use crate::crawler::fetcher::FetchResult;
use crate::crawler::parser::Document;
use crate::url::{canonicalize_parsed, CanonicalUrl};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Reasons a page yields no links at all
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Fetch did not succeed (status {0:?})")]
    BadStatus(Option<u16>),

    #[error("Fetch returned no content")]
    NoContent,

    #[error("Cannot resolve links against '{0}'")]
    InvalidBase(String),
}

/// Extracts canonical outbound links from a fetched page
///
/// # Arguments
///
/// * `url` - The URL that was requested
/// * `fetch` - The fetch result for that URL
/// * `document` - The parsed body of the fetch
///
/// # Returns
///
/// * `Ok(Vec<CanonicalUrl>)` - Links in first-occurrence order (possibly empty)
/// * `Err(ExtractError)` - The fetch is unusable or no base URL resolves
///
/// # Example
///
/// ```
/// use scholar_crawl::crawler::{extract_links, Document, FetchResult};
///
/// let body = r#"<a href="/a">A</a><a href="b/">B</a><a href="/a#x">A again</a>"#;
/// let fetch = FetchResult::html("https://www.ics.uci.edu/dir/", body);
/// let document = Document::parse_str(body);
/// let links = extract_links("https://www.ics.uci.edu/dir/", &fetch, &document).unwrap();
/// let links: Vec<&str> = links.iter().map(|l| l.as_str()).collect();
/// assert_eq!(links, vec!["https://www.ics.uci.edu/a", "https://www.ics.uci.edu/dir/b"]);
/// ```
pub fn extract_links(
    url: &str,
    fetch: &FetchResult,
    document: &Document,
) -> Result<Vec<CanonicalUrl>, ExtractError> {
    if !fetch.is_success() {
        return Err(ExtractError::BadStatus(fetch.status));
    }

    if fetch.body().is_none() {
        return Err(ExtractError::NoContent);
    }

    let base = Url::parse(fetch.base_url(url))
        .or_else(|_| Url::parse(url))
        .map_err(|_| ExtractError::InvalidBase(fetch.base_url(url).to_string()))?;

    Ok(resolve_links(&base, document.link_targets()))
}

/// Like [`extract_links`], but any failure yields an empty list
pub fn extract_links_lenient(
    url: &str,
    fetch: &FetchResult,
    document: &Document,
) -> Vec<CanonicalUrl> {
    extract_links(url, fetch, document).unwrap_or_else(|e| {
        tracing::debug!("No links extracted from {}: {}", url, e);
        Vec::new()
    })
}

/// Resolves link targets against a base URL, keeping first occurrences
fn resolve_links<'a>(base: &Url, targets: impl IntoIterator<Item = &'a str>) -> Vec<CanonicalUrl> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in targets {
        let Some(link) = resolve_link(base, href) else {
            continue;
        };
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Resolves one target; `None` for anything that does not canonicalize
fn resolve_link(base: &Url, href: &str) -> Option<CanonicalUrl> {
    let mut absolute = base.join(href).ok()?;
    absolute.set_fragment(None);
    canonicalize_parsed(&absolute).ok()
}
