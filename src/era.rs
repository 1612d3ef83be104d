//! Era construction.
//!
//! Each boundary opens a run of weeks that lasts until the next boundary
//! (or the end of the sequence). A run's artist and track tallies are
//! merged into one, ranked by play count, and wrapped in an [`Era`].

use crate::error::SegmentError;
use crate::models::{ArtistPlays, Era, EraParts, TrackKey, TrackPlays, WeekBucket};
use crate::tally::Tally;
use log::debug;
use std::ops::Range;

/// Builds one era per run of weeks delimited by `boundaries`.
///
/// `boundaries` must be strictly ascending indices into `weeks`, as
/// returned by [`crate::boundary::detect_boundaries`]. Week 0 always
/// belongs to the first era even when the list does not start at 0.
///
/// Eras get sequential ids starting at 0. The start date is the Monday of
/// the first week. The end date is the last day with a play in the final
/// week when the bucket knows it, and that week's Sunday otherwise.
///
/// # Errors
///
/// Returns [`SegmentError::NoEras`] when `weeks` is empty.
pub fn build_eras(weeks: &[WeekBucket], boundaries: &[usize]) -> Result<Vec<Era>, SegmentError> {
    if weeks.is_empty() {
        return Err(SegmentError::NoEras);
    }

    let eras: Vec<Era> = era_ranges(weeks.len(), boundaries)
        .into_iter()
        .enumerate()
        .map(|(id, range)| merge_run(id, &weeks[range.clone()], range))
        .collect();

    debug!("Built {} eras from {} weeks", eras.len(), weeks.len());
    Ok(eras)
}

/// Splits `0..week_count` at each boundary. Out-of-range and duplicate
/// boundaries are ignored.
fn era_ranges(week_count: usize, boundaries: &[usize]) -> Vec<Range<usize>> {
    let mut starts: Vec<usize> = boundaries
        .iter()
        .copied()
        .filter(|&index| index > 0 && index < week_count)
        .collect();
    starts.sort_unstable();
    starts.dedup();
    starts.insert(0, 0);

    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| start..starts.get(k + 1).copied().unwrap_or(week_count))
        .collect()
}

fn merge_run(id: usize, run: &[WeekBucket], range: Range<usize>) -> Era {
    let mut artists: Tally<String> = Tally::new();
    let mut tracks: Tally<TrackKey> = Tally::new();
    let mut total_ms_played = 0;

    for week in run {
        artists.merge(&week.artists);
        tracks.merge(&week.tracks);
        total_ms_played += week.total_ms;
    }

    // run is never empty: every range has start < end
    let first = &run[0];
    let last = &run[run.len() - 1];

    let top_artists = artists
        .ranked()
        .into_iter()
        .map(|(name, plays)| ArtistPlays { name, plays })
        .collect();
    let top_tracks = tracks
        .ranked()
        .into_iter()
        .map(|(key, plays)| TrackPlays {
            track_name: key.track_name,
            artist_name: key.artist_name,
            plays,
        })
        .collect();

    Era::from(EraParts {
        id,
        start_date: first.week_start,
        end_date: last.last_activity.unwrap_or_else(|| last.week_end()),
        weeks: range,
        top_artists,
        top_tracks,
        total_ms_played,
    })
}
