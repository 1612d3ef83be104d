//! End-to-end segmentation: events → weeks → boundaries → eras.

use crate::aggregate::aggregate_weeks;
use crate::boundary::{find_boundaries, Boundary};
use crate::config::SegmentConfig;
use crate::era::build_eras;
use crate::error::SegmentError;
use crate::models::{Era, ListeningEvent};
use log::info;
use serde::Serialize;

/// Result of one segmentation run.
///
/// The weekly buckets are dropped once the eras are built; only their
/// count is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    pub eras: Vec<Era>,
    pub boundaries: Vec<Boundary>,
    pub week_count: usize,
}

/// Runs the full pipeline over one listening history.
///
/// Deterministic: the same events and config always give the same eras,
/// including the rank order of their artists and tracks.
///
/// # Errors
///
/// Returns [`SegmentError::NoEras`] when there are no events.
///
/// # Examples
///
/// ```
/// use eras::config::SegmentConfig;
/// use eras::error::SegmentError;
/// use eras::pipeline::segment_history;
///
/// let result = segment_history(&[], &SegmentConfig::default());
/// assert_eq!(result.unwrap_err(), SegmentError::NoEras);
/// ```
pub fn segment_history(
    events: &[ListeningEvent],
    config: &SegmentConfig,
) -> Result<Segmentation, SegmentError> {
    let weeks = aggregate_weeks(events);
    let boundaries = find_boundaries(&weeks, config);
    let indices: Vec<usize> = boundaries.iter().map(|b| b.index).collect();
    let eras = build_eras(&weeks, &indices)?;

    info!(
        "Segmented {} events over {} weeks into {} eras",
        events.len(),
        weeks.len(),
        eras.len()
    );

    Ok(Segmentation {
        eras,
        boundaries,
        week_count: weeks.len(),
    })
}
