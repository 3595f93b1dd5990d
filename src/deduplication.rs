// 🔍 Deduplication Engine - Greedy near-duplicate suppression over book titles
// First-seen wins: a record is kept unless its title matches an already kept one

use crate::normalize::normalize_title;
use crate::record::BookRecord;
use crate::similarity::{normalized_similarity, DEFAULT_SIMILARITY_THRESHOLD};
use log::debug;
use serde::{Deserialize, Serialize};

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

/// Why a record was discarded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Index of the discarded record in the input
    pub discarded_index: usize,

    /// Index of the retained record it matched, in the unique list
    pub kept_index: usize,

    /// Similarity score (0 - 100)
    pub score: u8,

    pub discarded_title: String,
    pub kept_title: String,
}

/// Unique list plus what was thrown away
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeduplicationOutcome {
    pub unique: Vec<BookRecord>,
    pub discarded: Vec<DuplicateMatch>,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    /// Scores strictly above this are near-duplicates (default: 80)
    pub similarity_threshold: f64,
}

impl DeduplicationEngine {
    /// Create engine with the default threshold
    pub fn new() -> Self {
        DeduplicationEngine {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_threshold(similarity_threshold: f64) -> Self {
        DeduplicationEngine {
            similarity_threshold,
        }
    }

    /// Walk the input once, comparing each record against every record kept so far.
    ///
    /// O(n²) comparisons. Input order decides which variant of a cluster survives,
    /// so callers must feed records in a stable order (years, then months).
    pub fn deduplicate(&self, records: &[BookRecord]) -> DeduplicationOutcome {
        let mut outcome = DeduplicationOutcome::default();

        // Normalized titles of kept records, parallel to outcome.unique
        let mut kept_titles: Vec<String> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let title = normalize_title(&record.title);

            match self.find_match(&title, &kept_titles) {
                Some((kept_index, score)) => {
                    debug!(
                        "Discarding {:?} ({}): matches {:?} with score {}",
                        record.title, record.author, outcome.unique[kept_index].title, score
                    );
                    outcome.discarded.push(DuplicateMatch {
                        discarded_index: index,
                        kept_index,
                        score,
                        discarded_title: record.title.clone(),
                        kept_title: outcome.unique[kept_index].title.clone(),
                    });
                }
                None => {
                    kept_titles.push(title);
                    outcome.unique.push(record.clone());
                }
            }
        }

        outcome
    }

    /// Just the unique list
    pub fn unique_records(&self, records: &[BookRecord]) -> Vec<BookRecord> {
        self.deduplicate(records).unique
    }

    /// First kept title that is a near-duplicate of `title`
    fn find_match(&self, title: &str, kept_titles: &[String]) -> Option<(usize, u8)> {
        kept_titles.iter().enumerate().find_map(|(i, kept)| {
            let score = normalized_similarity(title, kept);
            if f64::from(score) > self.similarity_threshold {
                Some((i, score))
            } else {
                None
            }
        })
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
