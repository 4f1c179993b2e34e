use crate::UrlError;
use std::fmt;
use url::Url;

/// Schemes a canonical URL may carry
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// A URL in canonical form
///
/// Invariants: scheme is http or https, no fragment, non-empty lowercase host,
/// port present only when it differs from the scheme default, path is `/` or
/// has neither a trailing slash nor runs of slashes, query kept as parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the lowercase host of this URL
    pub fn host(&self) -> Option<&str> {
        let rest = self.0.split_once("://")?.1;
        let authority = rest.split(['/', '?']).next()?;
        // IPv6 literals keep their brackets, so only strip a trailing port
        let host = match authority.rsplit_once(':') {
            Some((host, port))
                if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
            {
                host
            }
            _ => authority,
        };
        (!host.is_empty()).then_some(host)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0
    }
}

/// Canonicalizes a URL according to Scholar-Crawl's rules
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than http and https
/// 3. Reject an empty host, lowercase the rest
/// 4. Keep the port only when it is not the scheme default
/// 5. Collapse runs of slashes in the path
/// 6. Strip one trailing slash unless the path is the root
/// 7. Drop the fragment, keep the query exactly as parsed
///
/// Rejection is reported through [`UrlError`]; this function never panics.
///
/// # Examples
///
/// ```
/// use scholar_crawl::url::canonicalize;
///
/// let url = canonicalize("http://Host.EDU:80/a//b/#top").unwrap();
/// assert_eq!(url.as_str(), "http://host.edu/a/b");
/// ```
pub fn canonicalize(url_str: &str) -> Result<CanonicalUrl, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize_parsed(&url)
}

/// Canonicalizes an already parsed URL
pub fn canonicalize_parsed(url: &Url) -> Result<CanonicalUrl, UrlError> {
    let scheme = url.scheme();
    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            scheme
        )));
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(UrlError::MissingDomain),
    };

    let path = normalize_path(url.path());
    let mut canonical = String::with_capacity(url.as_str().len());
    canonical.push_str(scheme);
    canonical.push_str("://");
    canonical.push_str(&host);

    // The url crate already reports a default port as absent
    if let Some(port) = url.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }

    canonical.push_str(&path);

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }

    Ok(CanonicalUrl(canonical))
}

/// Collapses slash runs and strips a single trailing slash
fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for c in path.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }

    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}
