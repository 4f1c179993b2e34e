//! HTML document wrapper
//!
//! This module turns a fetched body into a traversable document and offers
//! the two views the crawler needs:
//! - Hyperlink targets in document order
//! - Visible text with boilerplate elements removed

use scraper::{Html, Selector};

/// Elements whose text never counts as page content
pub const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "iframe", "svg", "button", "select", "textarea",
];

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw bytes, replacing invalid UTF-8 sequences
    pub fn parse(content: &[u8]) -> Self {
        Self::parse_str(&String::from_utf8_lossy(content))
    }

    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Returns every non-empty hyperlink target in document order
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` and `<area href="...">` anywhere in the document
    ///
    /// **Exclude:**
    /// - Elements whose `href` is empty or whitespace
    pub fn link_targets(&self) -> Vec<&str> {
        let mut targets = Vec::new();

        if let Ok(selector) = Selector::parse("a[href], area[href]") {
            for element in self.html.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    let href = href.trim();
                    if !href.is_empty() {
                        targets.push(href);
                    }
                }
            }
        }

        targets
    }

    /// Returns the visible text joined with single spaces
    ///
    /// Text inside boilerplate elements (scripts, styles, navigation, headers,
    /// footers, forms and similar) is dropped.
    pub fn visible_text(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![*self.html.root_element()];

        while let Some(node) = stack.pop() {
            if let Some(fragment) = node.value().as_text() {
                for word in fragment.split_whitespace() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(word);
                }
                continue;
            }

            if let Some(element) = node.value().as_element() {
                if BOILERPLATE_TAGS.contains(&element.name()) {
                    continue;
                }
            }

            // Reverse so the stack pops children in document order
            stack.extend(node.children().rev());
        }

        text
    }
}
