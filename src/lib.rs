// Best-seller Rankings - Core Library
// Collects monthly rankings into per-year tables and deduplicates titles across years

pub mod record;
pub mod normalize;      // Title normalizer
pub mod similarity;     // InDel ratio + near-duplicate predicate
pub mod deduplication;  // Greedy first-seen-wins filter
pub mod tables;         // Per-year TSV tables + top-N summaries
pub mod output;         // Atomic unique-list writer
pub mod config;
pub mod collector;      // RankingSource + PublishNews scraper
pub mod pipeline;

// Re-export commonly used types
pub use record::{BookRecord, RankingRow};
pub use normalize::normalize_title;
pub use similarity::{
    is_near_duplicate, similarity_score, DEFAULT_SIMILARITY_THRESHOLD,
};
pub use deduplication::{
    DeduplicationEngine, DeduplicationOutcome, DuplicateMatch,
};
pub use tables::{
    load_records, read_year_table, top_titles, write_top_table, write_year_table,
    LoadedRecords,
};
pub use output::write_unique_list;
pub use config::Config;
pub use collector::{collect_year, RankingSource};
#[cfg(feature = "collector")]
pub use collector::{parse_ranking_page, PublishNewsClient};
pub use pipeline::{run_collect, run_dedupe, CollectSummary, DedupeSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
