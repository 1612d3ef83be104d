//! Week-to-week taste similarity.
//!
//! Two weeks are compared by the Jaccard index of their most played
//! artists:
//!
//! ```text
//! n          = min(limit, |artists(a)|, |artists(b)|)
//! similarity = |top_n(a) ∩ top_n(b)| / |top_n(a) ∪ top_n(b)|
//! ```
//!
//! Cutting both sides to the same `n` keeps a quiet week (few artists)
//! from looking dissimilar to a busy one just because of its size.

use crate::config::DEFAULT_TOP_ARTIST_LIMIT;
use crate::models::WeekBucket;
use std::collections::HashSet;

/// Similarity of two weeks in `[0.0, 1.0]` using the default top-20 cutoff.
#[must_use]
pub fn similarity(a: &WeekBucket, b: &WeekBucket) -> f64 {
    similarity_with_limit(a, b, DEFAULT_TOP_ARTIST_LIMIT)
}

/// Similarity of two weeks comparing at most `limit` top artists each.
///
/// Returns 0.0 when either week has no artists. Artists with equal play
/// counts at the cutoff are chosen alphabetically, so the result is the
/// same whichever order the plays arrived in and `similarity(a, b)`
/// always equals `similarity(b, a)`.
#[must_use]
pub fn similarity_with_limit(a: &WeekBucket, b: &WeekBucket, limit: usize) -> f64 {
    let n = limit.min(a.artists.len()).min(b.artists.len());
    if n == 0 {
        return 0.0;
    }

    let top_a: HashSet<&String> = a.artists.top_keys(n).into_iter().collect();
    let top_b: HashSet<&String> = b.artists.top_keys(n).into_iter().collect();

    let intersection = top_a.intersection(&top_b).count();
    let union = top_a.union(&top_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week_with(artists: &[(&str, u64)]) -> WeekBucket {
        let mut bucket = WeekBucket::containing(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        for (name, plays) in artists {
            bucket.artists.add((*name).to_string(), *plays);
        }
        bucket
    }

    #[test]
    fn test_identical_weeks() {
        let a = week_with(&[("A", 3), ("B", 2), ("C", 1)]);
        assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_disjoint_weeks() {
        let a = week_with(&[("A", 3)]);
        let b = week_with(&[("B", 3)]);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_week_scores_zero() {
        let a = week_with(&[("A", 3)]);
        let empty = week_with(&[]);
        assert_eq!(similarity(&a, &empty), 0.0);
        assert_eq!(similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = week_with(&[("A", 5), ("B", 4), ("C", 3), ("D", 1)]);
        let b = week_with(&[("C", 9), ("A", 1)]);
        assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn test_cutoff_uses_smaller_week() {
        // n = 1: top of a is A, top of b is A
        let a = week_with(&[("A", 5), ("B", 4), ("C", 3)]);
        let b = week_with(&[("A", 2)]);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_one_shared_artist_out_of_twenty() {
        let mut left: Vec<(String, u64)> = (0..19).map(|i| (format!("left{i:02}"), 2)).collect();
        let mut right: Vec<(String, u64)> = (0..19).map(|i| (format!("right{i:02}"), 2)).collect();
        left.push(("shared".to_string(), 2));
        right.push(("shared".to_string(), 2));

        let a = week_with(&left.iter().map(|(n, c)| (n.as_str(), *c)).collect::<Vec<_>>());
        let b = week_with(&right.iter().map(|(n, c)| (n.as_str(), *c)).collect::<Vec<_>>());

        let score = similarity(&a, &b);
        assert!((score - 1.0 / 39.0).abs() < 1e-12);
        assert!(score < 0.3);
    }

    #[test]
    fn test_tie_at_cutoff_is_alphabetical() {
        // n = 1 and both "B" and "Z" have two plays in a: "B" wins
        let a = week_with(&[("Z", 2), ("B", 2)]);
        let b = week_with(&[("B", 1)]);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_limit_caps_comparison() {
        let a = week_with(&[("A", 9), ("B", 1), ("C", 1)]);
        let b = week_with(&[("A", 9), ("D", 1), ("E", 1)]);
        assert_eq!(similarity_with_limit(&a, &b, 1), 1.0);
        assert!(similarity_with_limit(&a, &b, 3) < 1.0);
    }
}
