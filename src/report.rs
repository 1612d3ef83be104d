//! Text and JSON rendering for the command-line output.

use crate::boundary::BoundaryReason;
use crate::models::{ArtistPlays, Era, WeekBucket};
use crate::naming::format_duration;
use crate::pipeline::Segmentation;
use crate::playlist::Playlist;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;

const LISTED_ARTISTS: usize = 5;
const LISTED_TRACKS: usize = 5;

/// JSON view of a week; tallies are flattened into a ranked artist list.
#[derive(Debug, Serialize)]
struct WeekSummary {
    week: String,
    week_start: NaiveDate,
    plays: u64,
    total_ms: u64,
    top_artists: Vec<ArtistPlays>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_activity: Option<NaiveDate>,
}

fn hours(ms: u64) -> String {
    format!("{:.1} h", ms as f64 / 3_600_000.0)
}

fn reason_text(reason: BoundaryReason) -> String {
    match reason {
        BoundaryReason::Start => "start of history".to_string(),
        BoundaryReason::Gap { days } => format!("after {days} days without plays"),
        BoundaryReason::Shift { similarity } => format!("taste shift, similarity {similarity:.2}"),
    }
}

/// Human-readable listing of all eras.
#[must_use]
pub fn render_segmentation(segmentation: &Segmentation) -> String {
    let mut out = format!(
        "{} eras over {} weeks\n",
        segmentation.eras.len(),
        segmentation.week_count
    );

    for era in &segmentation.eras {
        out.push('\n');
        let reason = segmentation
            .boundaries
            .get(era.id())
            .map(|b| reason_text(b.reason))
            .unwrap_or_default();
        out.push_str(&render_era(era, &reason));
    }
    out
}

fn render_era(era: &Era, reason: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Era {}: {} to {} ({}, {} weeks, {})",
        era.id(),
        era.start_date(),
        era.end_date(),
        format_duration(era.duration_days()),
        era.weeks().len(),
        hours(era.total_ms_played())
    );
    if !reason.is_empty() {
        let _ = writeln!(out, "  Opened by: {reason}");
    }
    if era.is_named() {
        let _ = writeln!(out, "  Title:     {}", era.title());
        if !era.summary().is_empty() {
            let _ = writeln!(out, "  Summary:   {}", era.summary());
        }
    }

    let artists = era
        .top_artists()
        .iter()
        .take(LISTED_ARTISTS)
        .map(|a| format!("{} ({})", a.name, a.plays))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  Artists:   {artists}");

    for (i, track) in era.top_tracks().iter().take(LISTED_TRACKS).enumerate() {
        let label = if i == 0 { "  Tracks:    " } else { "             " };
        let _ = writeln!(
            out,
            "{label}{} - {} ({})",
            track.artist_name, track.track_name, track.plays
        );
    }
    out
}

/// Human-readable listing of weekly buckets.
#[must_use]
pub fn render_weeks(weeks: &[WeekBucket]) -> String {
    let mut out = String::new();
    for week in weeks {
        let top = week
            .artists
            .ranked()
            .into_iter()
            .take(3)
            .map(|(name, plays)| format!("{name} ({plays})"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{}  {}  {:>4} plays  {:>8}  {top}",
            week.key,
            week.week_start,
            week.artists.total(),
            hours(week.total_ms)
        );
    }
    out
}

/// Human-readable playlist.
#[must_use]
pub fn render_playlist(playlist: &Playlist) -> String {
    let mut out = format!("Playlist for era {}\n", playlist.era_id);
    for (i, track) in playlist.tracks.iter().enumerate() {
        let _ = write!(out, "{:>3}. {} - {}", i + 1, track.artist_name, track.track_name);
        if let Some(uri) = &track.uri {
            let _ = write!(out, "  <{uri}>");
        }
        out.push('\n');
    }
    out
}

/// Pretty JSON of the weekly buckets.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn weeks_json(weeks: &[WeekBucket]) -> Result<String> {
    let summaries: Vec<WeekSummary> = weeks
        .iter()
        .map(|week| WeekSummary {
            week: week.key.to_string(),
            week_start: week.week_start,
            plays: week.artists.total(),
            total_ms: week.total_ms,
            top_artists: week
                .artists
                .ranked()
                .into_iter()
                .map(|(name, plays)| ArtistPlays { name, plays })
                .collect(),
            last_activity: week.last_activity,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}

/// Pretty JSON of any serializable value.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
