//! Integration tests for the crawl pipeline
//!
//! These tests drive whole pages through the crawler and check the resulting
//! links, aggregates and persisted snapshots.

use scholar_crawl::config::{parse_config, Config, PersistenceConfig, StorageBackend};
use scholar_crawl::output::{format_markdown_report, CrawlReport};
use scholar_crawl::state::DEFAULT_FLUSH_INTERVAL;
use scholar_crawl::storage::{JsonFileStore, SnapshotStore, SqliteSnapshotStore};
use scholar_crawl::{AnalysisOutcome, Crawler, FetchResult, SkipReason, StatsStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const VOCABULARY: &[&str] = &[
    "research", "students", "faculty", "computing", "algorithms", "networks", "security",
    "databases", "learning", "graphics", "systems", "theory",
];

/// Builds prose of `words` tokens, varied by `seed` so pages differ
fn prose(words: usize, seed: usize) -> String {
    (0..words)
        .map(|i| VOCABULARY[(i * 7 + seed) % VOCABULARY.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn page_html(body_words: usize, seed: usize, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}"></a>"#, href))
        .collect();
    format!(
        "<html><head><script>var tracking = true;</script></head><body>\
         <nav><a href=\"/\">Home</a></nav><p>{}</p>{}</body></html>",
        prose(body_words, seed),
        anchors
    )
}

fn memory_crawler() -> Crawler {
    Crawler::new(Config::default(), Arc::new(StatsStore::in_memory()))
}

#[test]
fn test_pipeline_end_to_end() {
    let crawler = memory_crawler();
    let html = page_html(
        200,
        0,
        &[
            "/people",
            "people#staff",
            "https://www.informatics.uci.edu/research/",
            "https://www.stat.uci.edu/seminars",
            "https://www.uci.edu/",
            "/assets/logo.png",
            "/calendar/?ical=1",
            "/wiki/doku.php?id=start&do=diff",
            "/a/b/c/d/e/f/g/h/i/j/k/l",
            "/x/x/x/x/page",
            "mailto:office@ics.uci.edu",
        ],
    );
    let fetch = FetchResult::html("https://www.ics.uci.edu/about/", html);

    let page = crawler.process_page("https://www.ics.uci.edu/about/", &fetch);

    let links: Vec<&str> = page.links.iter().map(|l| l.as_str()).collect();
    assert_eq!(
        links,
        vec![
            "https://www.ics.uci.edu/",
            "https://www.ics.uci.edu/people",
            "https://www.ics.uci.edu/about/people",
            "https://www.informatics.uci.edu/research",
            "https://www.stat.uci.edu/seminars",
        ]
    );
    assert_eq!(page.analysis, Some(AnalysisOutcome::Recorded { words: 200 }));

    let stats = crawler.stats();
    assert_eq!(stats.unique_pages(), 1);
    assert_eq!(
        stats.page_word_count("https://www.ics.uci.edu/about"),
        Some(200)
    );
    assert_eq!(
        stats.subdomain_counts(),
        vec![("www.ics.uci.edu".to_string(), 1)]
    );
    assert_eq!(stats.word_frequency("tracking"), 0);
}

#[test]
fn test_duplicate_links_keep_first_occurrence() {
    let crawler = memory_crawler();
    let html = page_html(10, 0, &["/a", "/b", "/a", "/c"]);
    let fetch = FetchResult::html("https://ics.uci.edu/", html);

    let links: Vec<String> = crawler
        .process("https://ics.uci.edu/", &fetch)
        .into_iter()
        .map(|l| l.into_string())
        .filter(|l| l != "https://ics.uci.edu/")
        .collect();

    assert_eq!(
        links,
        vec![
            "https://ics.uci.edu/a",
            "https://ics.uci.edu/b",
            "https://ics.uci.edu/c"
        ]
    );
}

#[test]
fn test_same_content_under_two_urls() {
    let crawler = memory_crawler();
    let html = page_html(150, 3, &[]);

    let first = crawler.process_page(
        "https://www.ics.uci.edu/page",
        &FetchResult::html("https://www.ics.uci.edu/page", html.clone()),
    );
    let second = crawler.process_page(
        "https://www.ics.uci.edu/page?print=1",
        &FetchResult::html("https://www.ics.uci.edu/page?print=1", html),
    );

    assert!(matches!(first.analysis, Some(AnalysisOutcome::Recorded { .. })));
    assert_eq!(
        second.analysis,
        Some(AnalysisOutcome::Skipped(SkipReason::DuplicateContent))
    );

    let stats = crawler.stats();
    assert_eq!(stats.unique_pages(), 1);
    assert_eq!(stats.fingerprint_count(), 1);
    assert_eq!(
        stats.page_word_count("https://www.ics.uci.edu/page?print=1"),
        None
    );

    let single = memory_crawler();
    single.process_page(
        "https://www.ics.uci.edu/page",
        &FetchResult::html("https://www.ics.uci.edu/page", page_html(150, 3, &[])),
    );
    assert_eq!(single.stats().top_words(20), stats.top_words(20));
}

#[test]
fn test_sparse_page_only_marks_seen() {
    let crawler = memory_crawler();
    let fetch = FetchResult::html("https://ics.uci.edu/short", page_html(40, 1, &["/next"]));

    let page = crawler.process_page("https://ics.uci.edu/short", &fetch);

    assert_eq!(page.links.len(), 2);
    assert!(matches!(
        page.analysis,
        Some(AnalysisOutcome::Skipped(SkipReason::TooFewTokens(_)))
    ));

    let snapshot = crawler.stats().snapshot();
    assert_eq!(snapshot.seen_urls.len(), 1);
    assert!(snapshot.page_word_counts.is_empty());
    assert!(snapshot.word_frequencies.is_empty());
    assert!(snapshot.subdomain_page_counts.is_empty());
    assert!(snapshot.content_fingerprints.is_empty());
    assert!(snapshot.longest_page_url.is_none());
}

#[test]
fn test_non_html_and_failed_fetches() {
    let crawler = memory_crawler();

    let pdf = FetchResult::html("https://ics.uci.edu/paper", "%PDF-1.7 <a href=\"/x\">x</a>")
        .with_header("Content-Type", "application/pdf");
    let page = crawler.process_page("https://ics.uci.edu/paper", &pdf);
    assert_eq!(
        page.analysis,
        Some(AnalysisOutcome::Skipped(SkipReason::NotHtml))
    );

    let gone = FetchResult::failed(404, "Not Found");
    let page = crawler.process_page("https://ics.uci.edu/gone", &gone);
    assert!(page.links.is_empty());
    assert_eq!(
        page.analysis,
        Some(AnalysisOutcome::Skipped(SkipReason::BadStatus(Some(404))))
    );

    assert_eq!(crawler.stats().seen_count(), 0);
}

fn persisted_crawl(config: Config) -> scholar_crawl::CrawlSnapshot {
    let crawler = Crawler::from_config(config).unwrap();
    for (i, path) in ["/a", "/b", "/c"].iter().enumerate() {
        let url = format!("https://vision.ics.uci.edu{}", path);
        crawler.process(&url, &FetchResult::html(&url, page_html(120 + i * 10, i, &[])));
    }
    crawler.stats().flush().unwrap();
    crawler.stats().snapshot()
}

#[test]
fn test_json_snapshot_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        persistence: PersistenceConfig {
            backend: StorageBackend::Json,
            snapshot_path: dir.path().join("stats.json").display().to_string(),
            ..PersistenceConfig::default()
        },
        ..Config::default()
    };

    let before = persisted_crawl(config.clone());
    assert_eq!(before.unique_pages(), 3);
    assert_eq!(
        before.longest_page(),
        Some(("https://vision.ics.uci.edu/c", 140))
    );

    let restarted = StatsStore::from_config(&config.persistence).unwrap();
    assert_eq!(restarted.snapshot(), before);
}

#[test]
fn test_sqlite_snapshot_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = parse_config(&format!(
        r#"
        [persistence]
        backend = "sqlite"
        snapshot-path = "{}"
        "#,
        dir.path().join("stats.db").display()
    ))
    .unwrap();

    let before = persisted_crawl(config.clone());
    let restarted = StatsStore::from_config(&config.persistence).unwrap();
    assert_eq!(restarted.snapshot(), before);
    assert!(restarted.is_seen("https://vision.ics.uci.edu/b"));
}

#[test]
fn test_sqlite_snapshot_in_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("stats.db");
    let config = Config {
        persistence: PersistenceConfig {
            backend: StorageBackend::Sqlite,
            snapshot_path: path.display().to_string(),
            ..PersistenceConfig::default()
        },
        ..Config::default()
    };

    let crawler = Crawler::from_config(config.clone()).unwrap();
    assert!(crawler.stats().snapshot().is_empty());
    drop(crawler);

    let before = persisted_crawl(config.clone());
    assert_eq!(before.unique_pages(), 3);
    assert!(path.exists());
}

#[test]
fn test_missing_or_corrupt_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();

    let missing = StatsStore::open(
        Box::new(JsonFileStore::new(dir.path().join("none.json"))),
        DEFAULT_FLUSH_INTERVAL,
    );
    assert!(missing.snapshot().is_empty());

    let corrupt_path = dir.path().join("corrupt.json");
    std::fs::write(&corrupt_path, r#"{"seen_urls": "#).unwrap();
    let corrupt = StatsStore::open(
        Box::new(JsonFileStore::new(&corrupt_path)),
        DEFAULT_FLUSH_INTERVAL,
    );
    assert!(corrupt.snapshot().is_empty());

    // The next flush replaces the corrupt file with a readable one
    corrupt.mark_seen("https://ics.uci.edu/");
    corrupt.flush().unwrap();
    let reloaded = JsonFileStore::new(&corrupt_path).load().unwrap().unwrap();
    assert_eq!(reloaded.seen_urls.len(), 1);
}

#[test]
fn test_throttled_flush_writes_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats.db");
    let stats = Arc::new(StatsStore::open(
        Box::new(SqliteSnapshotStore::new(&path).unwrap()),
        Duration::from_secs(3600),
    ));
    let crawler = Crawler::new(Config::default(), Arc::clone(&stats));

    crawler.process(
        "https://ics.uci.edu/first",
        &FetchResult::html("https://ics.uci.edu/first", page_html(130, 0, &[])),
    );
    crawler.process(
        "https://ics.uci.edu/second",
        &FetchResult::html("https://ics.uci.edu/second", page_html(130, 5, &[])),
    );

    // Only the first successful analysis fell outside the throttle window
    let saved = SqliteSnapshotStore::new(&path).unwrap().load().unwrap().unwrap();
    assert_eq!(saved.unique_pages(), 1);

    stats.flush().unwrap();
    let saved = SqliteSnapshotStore::new(&path).unwrap().load().unwrap().unwrap();
    assert_eq!(saved.unique_pages(), 2);
}

#[test]
fn test_concurrent_analysis_records_every_page_once() {
    const WORKERS: usize = 8;
    const PAGES_PER_WORKER: usize = 12;

    let crawler = memory_crawler();

    std::thread::scope(|scope| {
        for worker in 0..WORKERS {
            let crawler = &crawler;
            scope.spawn(move || {
                for n in 0..PAGES_PER_WORKER {
                    let id = worker * PAGES_PER_WORKER + n;
                    let url = format!("https://ics.uci.edu/page/{}", id);
                    let html = format!("<p>page {} </p>{}", id, page_html(110, id, &[]));
                    crawler.process(&url, &FetchResult::html(&url, html));

                    // Every worker also races on one shared page
                    let shared = "https://ics.uci.edu/shared";
                    crawler.process(shared, &FetchResult::html(shared, page_html(300, 1, &[])));
                }
            });
        }
    });

    let stats = crawler.stats();
    assert_eq!(stats.unique_pages(), WORKERS * PAGES_PER_WORKER + 1);
    assert_eq!(stats.fingerprint_count(), WORKERS * PAGES_PER_WORKER + 1);
    assert_eq!(stats.page_word_count("https://ics.uci.edu/shared"), Some(300));
    assert_eq!(
        stats.longest_page(),
        Some(("https://ics.uci.edu/shared".to_string(), 300))
    );
    assert_eq!(
        stats.subdomain_counts(),
        vec![(
            "ics.uci.edu".to_string(),
            (WORKERS * PAGES_PER_WORKER + 1) as u64
        )]
    );
}

#[test]
fn test_report_from_crawl() {
    let crawler = memory_crawler();
    for (i, host) in ["https://ics.uci.edu/", "https://cml.ics.uci.edu/", "https://ics.uci.edu/x"]
        .iter()
        .enumerate()
    {
        crawler.process(host, &FetchResult::html(*host, page_html(100 + i, i, &[])));
    }

    let report = CrawlReport::from_snapshot(&crawler.stats().snapshot(), 5);
    assert_eq!(report.unique_pages, 3);
    assert_eq!(report.top_words.len(), 5);
    assert_eq!(
        report.subdomains,
        vec![
            ("cml.ics.uci.edu".to_string(), 1),
            ("ics.uci.edu".to_string(), 2)
        ]
    );

    let md = format_markdown_report(&report);
    assert!(md.contains("| cml.ics.uci.edu | 1 |"));
}
