//! Weekly aggregation of listening events.
//!
//! Groups a flat event sequence into one [`WeekBucket`] per ISO week that
//! has at least one play. Input order does not matter.

use crate::models::{monday_of, ListeningEvent, WeekBucket};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Groups `events` by ISO week.
///
/// Returns buckets sorted ascending by `week_start`, one per distinct
/// (ISO year, week) present in the input. Every event is counted exactly
/// once. An empty input yields an empty vector.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use eras::aggregate::aggregate_weeks;
/// use eras::models::ListeningEvent;
///
/// let events = vec![
///     ListeningEvent::new(Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap(), "Low", "Lullaby", 45_000),
///     ListeningEvent::new(Utc.with_ymd_and_hms(2023, 5, 3, 9, 0, 0).unwrap(), "Low", "Plastic Cup", 50_000),
/// ];
///
/// let weeks = aggregate_weeks(&events);
/// assert_eq!(weeks.len(), 1);
/// assert_eq!(weeks[0].total_ms, 95_000);
/// ```
#[must_use]
pub fn aggregate_weeks(events: &[ListeningEvent]) -> Vec<WeekBucket> {
    // keyed by Monday, which orders the same way as (iso_year, week)
    let mut weeks: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for event in events {
        let date = event.date();
        weeks
            .entry(monday_of(date))
            .or_insert_with(|| WeekBucket::containing(date))
            .record(event);
    }

    debug!("Aggregated {} events into {} weeks", events.len(), weeks.len());
    weeks.into_values().collect()
}
