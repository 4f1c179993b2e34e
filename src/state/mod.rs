//! Crawl statistics state
//!
//! - `CrawlSnapshot`: the serializable aggregates of a crawl
//! - `StatsStore`: thread-safe owner of those aggregates with throttled persistence

mod snapshot;
mod store;

pub use snapshot::CrawlSnapshot;
pub use store::{PageMeasurement, RecordOutcome, StatsStore, DEFAULT_FLUSH_INTERVAL};
