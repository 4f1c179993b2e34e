//! Scholar-Crawl main entry point
//!
//! This is the command-line interface for the Scholar-Crawl link policy and
//! crawl analytics core.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scholar_crawl::config::{load_config_with_hash, Config};
use scholar_crawl::output::{print_report, write_markdown_report, CrawlReport, DEFAULT_TOP_WORDS};
use scholar_crawl::url::{check_url, PolicyFilter};
use scholar_crawl::{Crawler, FetchResult, StatsStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Scholar-Crawl: link extraction and crawl policy for academic domains
///
/// Canonicalizes and filters URLs, extracts crawlable links from fetched
/// pages, and keeps persistent analytics on the pages crawled so far.
#[derive(Parser, Debug)]
#[command(name = "scholar-crawl")]
#[command(version = "1.0.0")]
#[command(about = "Crawl policy and analytics for a focused academic crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the canonical form and crawl verdict of each URL
    Check {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },

    /// Run a saved HTML page through the pipeline as if it had been fetched
    Analyze {
        /// URL the page was fetched from
        #[arg(long)]
        url: String,

        /// HTML file holding the page body
        #[arg(value_name = "HTML_FILE")]
        file: PathBuf,
    },

    /// Print analytics from the saved snapshot
    Report {
        /// Number of most common words to list
        #[arg(long, default_value_t = DEFAULT_TOP_WORDS)]
        top: usize,

        /// Also write the report as markdown
        #[arg(long, value_name = "PATH")]
        markdown: Option<PathBuf>,
    },

    /// Replace the saved snapshot with empty state
    Reset,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Check { urls } => handle_check(&config, &urls),
        Command::Analyze { url, file } => handle_analyze(config, &url, &file)?,
        Command::Report { top, markdown } => handle_report(&config, top, markdown.as_deref())?,
        Command::Reset => handle_reset(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scholar_crawl=info,warn"),
            1 => EnvFilter::new("scholar_crawl=debug,info"),
            2 => EnvFilter::new("scholar_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles `check`: prints one verdict line per URL
fn handle_check(config: &Config, urls: &[String]) {
    let filter = PolicyFilter::new(&config.policy);

    for raw in urls {
        let (canonical, verdict) = check_url(raw, &filter);
        let shown = canonical
            .as_ref()
            .map(|c| c.as_str())
            .unwrap_or(raw.as_str());

        match verdict.reason() {
            None => println!("CRAWL   {}", shown),
            Some(reason) => println!("REJECT  {} ({})", shown, reason),
        }
    }
}

/// Handles `analyze`: runs the pipeline on a local HTML file
fn handle_analyze(config: Config, url: &str, file: &Path) -> anyhow::Result<()> {
    let body =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let fetch = FetchResult::html(url, body);

    let crawler = Crawler::from_config(config)?;
    let page = crawler.process_page(url, &fetch);

    match page.analysis {
        Some(outcome) => println!("Analysis: {:?}", outcome),
        None => println!("Analysis: not performed (unparseable URL)"),
    }
    println!(
        "Links: {} crawlable, {} rejected",
        page.links.len(),
        page.rejected
    );
    for link in &page.links {
        println!("  {}", link);
    }

    crawler
        .stats()
        .flush()
        .context("Failed to save crawl statistics")?;
    Ok(())
}

/// Handles `report`: prints analytics and optionally writes markdown
fn handle_report(config: &Config, top: usize, markdown: Option<&Path>) -> anyhow::Result<()> {
    let stats = StatsStore::from_config(&config.persistence)?;
    let report = CrawlReport::from_snapshot(&stats.snapshot(), top);

    print_report(&report);

    if let Some(path) = markdown {
        write_markdown_report(&report, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\n✓ Report exported to: {}", path.display());
    }

    Ok(())
}

/// Handles `reset`: overwrites the snapshot with empty state
fn handle_reset(config: &Config) -> anyhow::Result<()> {
    let stats = StatsStore::from_config(&config.persistence)?;
    stats.reset();
    stats.flush().context("Failed to save empty snapshot")?;

    println!("✓ Snapshot reset: {}", config.persistence.snapshot_path);
    Ok(())
}
