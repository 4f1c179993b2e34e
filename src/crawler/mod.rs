//! Crawler module for processing fetched pages
//!
//! This module contains the per-page crawling logic, including:
//! - The fetch result contract supplied by the external fetcher
//! - HTML parsing into link targets and visible text
//! - Link extraction and canonicalization
//! - The pipeline that ties extraction, filtering and analysis together

mod coordinator;
mod extractor;
mod fetcher;
mod parser;

pub use coordinator::{Crawler, ProcessedPage};
pub use extractor::{extract_links, extract_links_lenient, ExtractError};
pub use fetcher::{FetchResult, Headers};
pub use parser::{Document, BOILERPLATE_TAGS};
