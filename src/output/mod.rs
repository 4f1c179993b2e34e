//! Output module for crawl reports
//!
//! This module handles:
//! - Building a report from the crawl snapshot
//! - Printing it to the console
//! - Writing it as markdown

mod markdown;
mod report;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{print_report, CrawlReport, DEFAULT_TOP_WORDS};
