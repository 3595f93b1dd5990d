// 🔎 Similarity Predicate - Are two titles the same work?
//
// Score = InDel ratio on normalized titles, the classic "ratio" of fuzzy
// matchers: 100 * (1 - indel / (len_a + len_b)), where indel only counts
// insertions and deletions (a substitution costs 2). Lengths are counted
// in chars, not bytes.

use crate::normalize::normalize_title;
use rapidfuzz::distance::indel;

/// Default cut-off: scores strictly above this are near-duplicates
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 80.0;

// ============================================================================
// SCORING
// ============================================================================

/// Similarity of two raw titles in [0, 100] (normalizes both first)
pub fn similarity_score(a: &str, b: &str) -> u8 {
    normalized_similarity(&normalize_title(a), &normalize_title(b))
}

/// Same as [`similarity_score`] for titles that are already normalized.
/// The deduplicator uses this to avoid re-normalizing retained titles.
pub fn normalized_similarity(a: &str, b: &str) -> u8 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        // empty vs empty is a perfect match
        return 100;
    }

    let distance = indel_distance(a, b);
    let ratio = 100.0 * (total - distance) as f64 / total as f64;

    ratio.round_ties_even() as u8
}

/// Edit distance with insertions and deletions only, over chars
pub fn indel_distance(a: &str, b: &str) -> usize {
    indel::distance(a.chars(), b.chars())
}

// ============================================================================
// PREDICATE
// ============================================================================

/// Near-duplicate when the score is strictly greater than the threshold.
/// Not transitive: a ≈ b and b ≈ c does not imply a ≈ c.
pub fn is_near_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    f64::from(similarity_score(a, b)) > threshold
}

// ============================================================================
// TESTS
// ============================================================================
