use crate::url::matcher::matches_domain;

/// Returns the host to credit in subdomain statistics
///
/// Hosts outside `top_level_domain` are not tracked and yield `None`.
pub fn subdomain_within<'a>(host: &'a str, top_level_domain: &str) -> Option<&'a str> {
    matches_domain(top_level_domain, host).then_some(host)
}
