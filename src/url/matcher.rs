/// Checks if a host lies within an allowed domain
///
/// A host matches when it equals the domain or is a subdomain of it on a
/// dot-separated label boundary:
/// - "ics.uci.edu" matches "ics.uci.edu"
/// - "vision.ics.uci.edu" matches "ics.uci.edu"
/// - "notics.uci.edu" does not match "ics.uci.edu"
///
/// A leading "*." or "." on the domain is ignored, so configuration written as
/// "*.ics.uci.edu" behaves the same as "ics.uci.edu".
///
/// # Arguments
///
/// * `domain` - The allowed domain suffix (lowercase)
/// * `host` - The host to check (lowercase)
///
/// # Examples
///
/// ```
/// use scholar_crawl::url::matches_domain;
///
/// assert!(matches_domain("ics.uci.edu", "ics.uci.edu"));
/// assert!(matches_domain("ics.uci.edu", "www.ics.uci.edu"));
/// assert!(!matches_domain("ics.uci.edu", "notics.uci.edu"));
/// assert!(!matches_domain("ics.uci.edu", "uci.edu"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    let base = domain
        .strip_prefix("*.")
        .or_else(|| domain.strip_prefix('.'))
        .unwrap_or(domain);

    if base.is_empty() || host.is_empty() {
        return false;
    }

    match host.strip_suffix(base) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

/// Checks a host against a list of allowed domains
pub fn matches_any_domain<S: AsRef<str>>(domains: &[S], host: &str) -> bool {
    domains.iter().any(|d| matches_domain(d.as_ref(), host))
}
