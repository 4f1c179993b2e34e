//! Markdown report generation
//!
//! This module writes a crawl report as a human-readable markdown document.

use crate::output::report::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to write the file
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Scholar-Crawl Report\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        report.generated_at.to_rfc3339()
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Unique Pages**: {}\n", report.unique_pages));
    md.push_str(&format!("- **URLs Seen**: {}\n", report.seen_urls));
    md.push_str(&format!(
        "- **Skipped After Fetch**: {}\n",
        report.skipped_urls()
    ));
    md.push_str(&format!(
        "- **Content Fingerprints**: {}\n\n",
        report.fingerprints
    ));

    md.push_str("## Longest Page\n\n");
    match &report.longest_page {
        Some((url, words)) => md.push_str(&format!("{} ({} words)\n\n", url, words)),
        None => md.push_str("No pages recorded.\n\n"),
    }

    if !report.top_words.is_empty() {
        md.push_str("## Most Common Words\n\n");
        md.push_str("| Rank | Word | Count |\n");
        md.push_str("|------|------|-------|\n");
        for (rank, (word, count)) in report.top_words.iter().enumerate() {
            md.push_str(&format!("| {} | {} | {} |\n", rank + 1, word, count));
        }
        md.push('\n');
    }

    if !report.subdomains.is_empty() {
        md.push_str("## Subdomains\n\n");
        md.push_str("| Subdomain | Pages |\n");
        md.push_str("|-----------|-------|\n");
        for (host, count) in &report.subdomains {
            md.push_str(&format!("| {} | {} |\n", host, count));
        }
        md.push('\n');
    }

    md
}
