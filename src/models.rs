//! # Data Model
//!
//! Types shared by every stage of the segmentation pipeline:
//!
//! - [`ListeningEvent`] - one play record, produced by [`crate::ingest`]
//! - [`WeekKey`] / [`WeekBucket`] - per-ISO-week aggregates
//! - [`Era`] - a contiguous run of weeks with merged statistics
//!
//! Weeks live only for the duration of one pipeline run. Eras are created
//! once by [`crate::era::build_eras`]; afterwards only their title and
//! summary can change, which is why their fields are read through
//! accessors.

use crate::tally::Tally;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A single play of a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningEvent {
    pub timestamp: DateTime<Utc>,
    pub artist_name: String,
    pub track_name: String,
    pub ms_played: u64,
    /// Opaque catalog identifier, e.g. `spotify:track:...`
    pub track_uri: Option<String>,
}

impl ListeningEvent {
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        artist_name: impl Into<String>,
        track_name: impl Into<String>,
        ms_played: u64,
    ) -> Self {
        Self {
            timestamp,
            artist_name: artist_name.into(),
            track_name: track_name.into(),
            ms_played,
            track_uri: None,
        }
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.track_uri = Some(uri.into());
        self
    }

    /// Calendar day of the play.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// ISO-8601 (year, week) pair.
///
/// The ISO year differs from the calendar year around New Year: 2024-12-30
/// belongs to week 1 of ISO year 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub iso_year: i32,
    pub week: u32,
}

impl WeekKey {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            iso_year: iso.year(),
            week: iso.week(),
        }
    }

    /// Monday of this ISO week.
    ///
    /// Week 1 is the week containing January 4th, so its Monday is
    /// `jan4 - weekday_offset(jan4)`; later weeks follow in 7-day steps.
    #[must_use]
    pub fn week_start(self) -> Option<NaiveDate> {
        let jan4 = NaiveDate::from_ymd_opt(self.iso_year, 1, 4)?;
        let offset = i64::from(jan4.weekday().num_days_from_monday());
        Some(jan4 - Duration::days(offset) + Duration::weeks(i64::from(self.week) - 1))
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.iso_year, self.week)
    }
}

/// Monday of the ISO week containing `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// (track, artist) identity of a track. Two tracks with the same title by
/// different artists are different tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey {
    pub track_name: String,
    pub artist_name: String,
}

impl TrackKey {
    #[must_use]
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
        }
    }
}

/// Aggregated listening for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub key: WeekKey,
    pub week_start: NaiveDate,
    pub artists: Tally<String>,
    pub tracks: Tally<TrackKey>,
    pub total_ms: u64,
    /// Latest day in this week with a play, when known.
    pub last_activity: Option<NaiveDate>,
}

impl WeekBucket {
    /// Empty bucket for the ISO week containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            key: WeekKey::of(date),
            week_start: monday_of(date),
            artists: Tally::new(),
            tracks: Tally::new(),
            total_ms: 0,
            last_activity: None,
        }
    }

    /// Counts one play into this week.
    pub fn record(&mut self, event: &ListeningEvent) {
        self.artists.increment(event.artist_name.clone());
        self.tracks
            .increment(TrackKey::new(&event.track_name, &event.artist_name));
        self.total_ms += event.ms_played;

        let day = event.date();
        if self.last_activity.map_or(true, |last| day > last) {
            self.last_activity = Some(day);
        }
    }

    /// Sunday of this week.
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }
}

/// An artist with its play count inside an era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistPlays {
    pub name: String,
    pub plays: u64,
}

/// A track with its play count inside an era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPlays {
    pub track_name: String,
    pub artist_name: String,
    pub plays: u64,
}

/// A contiguous span of weeks with a coherent listening pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Era {
    id: usize,
    start_date: NaiveDate,
    end_date: NaiveDate,
    first_week: usize,
    week_count: usize,
    top_artists: Vec<ArtistPlays>,
    top_tracks: Vec<TrackPlays>,
    total_ms_played: u64,
    title: String,
    summary: String,
}

/// Everything an era is built from. Kept separate so [`Era`] itself has no
/// public mutable fields.
#[derive(Debug, Clone)]
pub struct EraParts {
    pub id: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weeks: Range<usize>,
    pub top_artists: Vec<ArtistPlays>,
    pub top_tracks: Vec<TrackPlays>,
    pub total_ms_played: u64,
}

impl From<EraParts> for Era {
    fn from(parts: EraParts) -> Self {
        Self {
            id: parts.id,
            start_date: parts.start_date,
            end_date: parts.end_date,
            first_week: parts.weeks.start,
            week_count: parts.weeks.len(),
            top_artists: parts.top_artists,
            top_tracks: parts.top_tracks,
            total_ms_played: parts.total_ms_played,
            title: String::new(),
            summary: String::new(),
        }
    }
}

impl Era {
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Inclusive length of the era in days.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Indices of the member weeks in the week sequence the era was built from.
    #[must_use]
    pub fn weeks(&self) -> Range<usize> {
        self.first_week..self.first_week + self.week_count
    }

    #[must_use]
    pub fn top_artists(&self) -> &[ArtistPlays] {
        &self.top_artists
    }

    #[must_use]
    pub fn top_tracks(&self) -> &[TrackPlays] {
        &self.top_tracks
    }

    #[must_use]
    pub fn total_ms_played(&self) -> u64 {
        self.total_ms_played
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.title.is_empty()
    }

    /// Attaches a title and summary. The only mutation an era accepts.
    pub fn set_name(&mut self, title: impl Into<String>, summary: impl Into<String>) {
        self.title = title.into();
        self.summary = summary.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_key_year_boundary() {
        // Monday 2024-12-30 is in ISO week 1 of 2025
        assert_eq!(WeekKey::of(date(2024, 12, 30)), WeekKey { iso_year: 2025, week: 1 });
        // Friday 2021-01-01 is in ISO week 53 of 2020
        assert_eq!(WeekKey::of(date(2021, 1, 1)), WeekKey { iso_year: 2020, week: 53 });
    }

    #[test]
    fn test_week_start_matches_monday_of() {
        for day in [
            date(2020, 12, 31),
            date(2021, 1, 3),
            date(2021, 1, 4),
            date(2023, 6, 15),
            date(2024, 12, 30),
            date(2026, 1, 1),
        ] {
            let key = WeekKey::of(day);
            assert_eq!(key.week_start(), Some(monday_of(day)), "week start for {day}");
        }
    }

    #[test]
    fn test_week_key_display() {
        assert_eq!(WeekKey { iso_year: 2023, week: 7 }.to_string(), "2023-W07");
    }

    #[test]
    fn test_bucket_record_tracks_last_activity() {
        let ts = |d| Utc.with_ymd_and_hms(2023, 3, d, 12, 0, 0).unwrap();
        let mut bucket = WeekBucket::containing(date(2023, 3, 15));

        bucket.record(&ListeningEvent::new(ts(16), "A", "Song", 40_000));
        bucket.record(&ListeningEvent::new(ts(14), "A", "Song", 60_000));

        assert_eq!(bucket.week_start, date(2023, 3, 13));
        assert_eq!(bucket.week_end(), date(2023, 3, 19));
        assert_eq!(bucket.total_ms, 100_000);
        assert_eq!(bucket.artists.get(&"A".to_string()), 2);
        assert_eq!(bucket.tracks.get(&TrackKey::new("Song", "A")), 2);
        assert_eq!(bucket.last_activity, Some(date(2023, 3, 16)));
    }

    #[test]
    fn test_era_name_is_the_only_mutation() {
        let mut era = Era::from(EraParts {
            id: 0,
            start_date: date(2023, 1, 2),
            end_date: date(2023, 1, 8),
            weeks: 0..1,
            top_artists: vec![],
            top_tracks: vec![],
            total_ms_played: 0,
        });

        assert!(!era.is_named());
        era.set_name("Winter Static", "Cold synths.");
        assert_eq!(era.title(), "Winter Static");
        assert_eq!(era.summary(), "Cold synths.");
        assert_eq!(era.duration_days(), 7);
        assert_eq!(era.weeks(), 0..1);
    }
}
