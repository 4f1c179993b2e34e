#![allow(clippy::expect_used)]

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("WORD regex"));

/// Shortest token kept by [`tokenize`]
pub const MIN_TOKEN_LEN: usize = 2;

/// Splits text into lowercase alphanumeric tokens of at least two characters
///
/// # Examples
///
/// ```
/// use scholar_crawl::analysis::tokenize;
///
/// assert_eq!(tokenize("CS-121: Web a crawler!"), vec!["cs", "121", "web", "crawler"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Returns true if the token consists only of ASCII letters
pub fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_uppercase())
}

/// Share of alphabetic characters among the non-whitespace characters of `text`
///
/// Text with no visible characters has a ratio of zero.
pub fn alpha_ratio(text: &str) -> f64 {
    let (alpha, total) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(alpha, total), c| {
            (alpha + usize::from(c.is_alphabetic()), total + 1)
        });

    if total == 0 {
        0.0
    } else {
        alpha as f64 / total as f64
    }
}

/// SHA-256 digest of normalized page text, hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints text after lowercasing and collapsing whitespace
    pub fn of(text: &str) -> Self {
        let normalized = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    pub fn into_hex(self) -> String {
        self.0
    }
}
