//! Page content analysis
//!
//! Tokenization, stop words, content fingerprints and the analyzer that
//! feeds qualifying pages into the crawl statistics.

mod analyzer;
mod stopwords;
mod tokenize;

pub use analyzer::{AnalysisOutcome, ContentAnalyzer, SkipReason};
pub use stopwords::{stop_word_set, STOP_WORDS};
pub use tokenize::{alpha_ratio, is_alphabetic, tokenize, Fingerprint, MIN_TOKEN_LEN};
