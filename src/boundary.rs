//! Era boundary detection.
//!
//! A single forward pass over the week sequence. Week 0 always opens an
//! era. Every later week opens a new one when either
//!
//! 1. more than `max_gap_days` separate its start from the previous
//!    week's start (similarity is not consulted for that transition), or
//! 2. its similarity to the previous week is strictly below the threshold.
//!
//! There is no lookahead or smoothing: a one-week detour that returns to
//! the old pattern produces two boundaries.

use crate::config::SegmentConfig;
use crate::models::WeekBucket;
use crate::similarity::similarity_with_limit;
use log::{debug, trace};
use serde::Serialize;

/// Why a week opens a new era.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryReason {
    /// First week of the history
    Start,
    /// Inactivity gap between consecutive week starts
    Gap { days: i64 },
    /// Taste shift between consecutive weeks
    Shift { similarity: f64 },
}

/// Index of the first week of an era, with the reason it was cut there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boundary {
    pub index: usize,
    pub reason: BoundaryReason,
}

/// Era-start indices into `weeks` using the given similarity threshold
/// and default gap/top-artist settings.
///
/// Returns `[]` for no weeks and `[0]` for a single week. The result is
/// strictly ascending.
#[must_use]
pub fn detect_boundaries(weeks: &[WeekBucket], threshold: f64) -> Vec<usize> {
    find_boundaries(weeks, &SegmentConfig::with_threshold(threshold))
        .into_iter()
        .map(|boundary| boundary.index)
        .collect()
}

/// Boundaries with their reasons, using every setting in `config`.
#[must_use]
pub fn find_boundaries(weeks: &[WeekBucket], config: &SegmentConfig) -> Vec<Boundary> {
    let Some(first) = weeks.first() else {
        return Vec::new();
    };

    let mut boundaries = vec![Boundary {
        index: 0,
        reason: BoundaryReason::Start,
    }];
    trace!("Week {} opens era 0", first.key);

    for (index, pair) in weeks.windows(2).enumerate().map(|(i, pair)| (i + 1, pair)) {
        let (previous, current) = (&pair[0], &pair[1]);

        let gap_days = (current.week_start - previous.week_start).num_days();
        if gap_days > config.max_gap_days {
            trace!("Week {} follows a {gap_days}-day gap", current.key);
            boundaries.push(Boundary {
                index,
                reason: BoundaryReason::Gap { days: gap_days },
            });
            continue;
        }

        let score = similarity_with_limit(previous, current, config.top_artist_limit);
        trace!("Similarity {} -> {}: {score:.3}", previous.key, current.key);
        if score < config.similarity_threshold {
            boundaries.push(Boundary {
                index,
                reason: BoundaryReason::Shift { similarity: score },
            });
        }
    }

    debug!(
        "Detected {} boundaries over {} weeks (threshold {})",
        boundaries.len(),
        weeks.len(),
        config.similarity_threshold
    );
    boundaries
}
