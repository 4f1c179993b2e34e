//! Fetch results handed to the core by the external fetcher
//!
//! The network transport lives outside this crate. Whatever performs the
//! request fills in a [`FetchResult`]; every field is optional so that a
//! partial or failed fetch degrades to "no usable content".

use std::collections::HashMap;

/// Response headers with case-insensitive name lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any value stored under the same name
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Looks up a header by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value.as_ref());
        }
        headers
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    /// Final URL after redirects, if the fetcher reported one
    pub url: Option<String>,

    /// HTTP status code
    pub status: Option<u16>,

    /// Error description for failed fetches
    pub error: Option<String>,

    /// Raw response body
    pub content: Option<Vec<u8>>,

    /// Response headers
    pub headers: Headers,
}

impl FetchResult {
    /// A successful HTML fetch of `url`
    ///
    /// # Example
    ///
    /// ```
    /// use scholar_crawl::crawler::FetchResult;
    ///
    /// let fetch = FetchResult::html("https://www.ics.uci.edu/", "<html></html>");
    /// assert!(fetch.is_success());
    /// assert_eq!(fetch.content_type(), Some("text/html; charset=utf-8"));
    /// ```
    pub fn html(url: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/html; charset=utf-8");
        Self {
            url: Some(url.to_string()),
            status: Some(200),
            error: None,
            content: Some(body.into()),
            headers,
        }
    }

    /// A failed fetch with the given status code
    pub fn failed(status: u16, error: &str) -> Self {
        Self {
            status: Some(status),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Sets a response header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the effective URL after redirects
    pub fn with_effective_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Returns true if the server answered 200 OK
    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }

    /// Returns the body if it is present and non-empty
    pub fn body(&self) -> Option<&[u8]> {
        self.content.as_deref().filter(|b| !b.is_empty())
    }

    /// Returns the declared Content-Type, if any
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Returns true unless a Content-Type is declared and is neither HTML nor XHTML
    pub fn is_html(&self) -> bool {
        match self.content_type() {
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml+xml")
            }
        }
    }

    /// Returns the URL relative links should be resolved against
    ///
    /// The effective URL wins when present, otherwise the requested URL.
    pub fn base_url<'a>(&'a self, requested: &'a str) -> &'a str {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(requested)
    }
}
