//! # Era Naming
//!
//! Attaches a title and a short summary to each era. The actual namer is
//! pluggable through [`EraNamer`]:
//!
//! - [`HeuristicNamer`] - offline, derives names from the era's top artists
//! - [`CompletionNamer`] - renders a prompt with [`build_era_prompt`], sends
//!   it to any [`Completion`] backend (e.g. an LLM client) and parses the
//!   JSON reply with [`parse_naming_response`]
//!
//! Namers are built by the caller and passed in; nothing here keeps
//! process-wide client state.

use crate::error::NamingError;
use crate::models::Era;
use log::{debug, warn};
use serde::Deserialize;
use std::fmt::Write as _;
use std::thread;
use std::time::Duration;

/// Title and summary for one era.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EraName {
    pub title: String,
    pub summary: String,
}

/// Something that can name an era.
pub trait EraNamer {
    /// Produces a name for `era`.
    ///
    /// # Errors
    ///
    /// Returns a [`NamingError`]; [`NamingError::Unavailable`] failures are
    /// retried by [`name_eras`].
    fn name(&self, era: &Era) -> Result<EraName, NamingError>;
}

/// A text completion backend, typically a chat model behind an HTTP API.
pub trait Completion {
    /// Sends `prompt` and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Backend failures mapped onto [`NamingError`].
    fn complete(&self, prompt: &str) -> Result<String, NamingError>;
}

/// Names eras by prompting a [`Completion`] backend.
#[derive(Debug, Clone)]
pub struct CompletionNamer<C> {
    backend: C,
    artist_limit: usize,
    track_limit: usize,
}

impl<C: Completion> CompletionNamer<C> {
    #[must_use]
    pub fn new(backend: C, artist_limit: usize, track_limit: usize) -> Self {
        Self {
            backend,
            artist_limit,
            track_limit,
        }
    }
}

impl<C: Completion> EraNamer for CompletionNamer<C> {
    fn name(&self, era: &Era) -> Result<EraName, NamingError> {
        let prompt = build_era_prompt(era, self.artist_limit, self.track_limit);
        let reply = self.backend.complete(&prompt)?;
        parse_naming_response(&reply)
    }
}

/// Offline namer built from play counts alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicNamer;

impl EraNamer for HeuristicNamer {
    fn name(&self, era: &Era) -> Result<EraName, NamingError> {
        let artists = era.top_artists();
        let title = match artists {
            [] => "Quiet Stretch".to_string(),
            [only] => format!("The {} Era", only.name),
            [first, second, ..] => format!("{} & {}", first.name, second.name),
        };

        let mut summary = format!(
            "{} of listening across {}.",
            format_hours(era.total_ms_played()),
            format_duration(era.duration_days())
        );
        if let Some(top) = artists.first() {
            let _ = write!(summary, " {} led with {} plays", top.name, top.plays);
            match era.top_tracks().first() {
                Some(track) => {
                    let _ = write!(
                        summary,
                        ", and \"{}\" by {} was on repeat.",
                        track.track_name, track.artist_name
                    );
                }
                None => summary.push('.'),
            }
        }

        Ok(EraName { title, summary })
    }
}

/// Exponential backoff for retryable naming failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based): base, 2×base, 4×base…
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Runs `op`, retrying retryable errors until attempts run out.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once all
    /// attempts are used.
    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T, NamingError>) -> Result<T, NamingError> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay(attempt);
                    debug!("Naming attempt {} failed ({e}), retrying in {delay:?}", attempt + 1);
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Names every era in place. Eras whose naming fails get the fallback
/// title "Era N" (1-based) and an empty summary.
///
/// Returns how many eras were named by `namer`.
pub fn name_eras(eras: &mut [Era], namer: &dyn EraNamer, policy: &RetryPolicy) -> usize {
    let mut named = 0;
    for era in eras.iter_mut() {
        let outcome = policy.run(|| namer.name(era));
        match outcome {
            Ok(name) => {
                era.set_name(name.title, name.summary);
                named += 1;
            }
            Err(e) => {
                warn!("Could not name era {}: {e}", era.id());
                era.set_name(format!("Era {}", era.id() + 1), String::new());
            }
        }
    }
    named
}

/// Human-readable length: days under two weeks, weeks under two months,
/// months (of 30 days) beyond.
#[must_use]
pub fn format_duration(days: i64) -> String {
    if days < 14 {
        format!("{days} days")
    } else if days < 60 {
        plural(days / 7, "week")
    } else {
        plural(days / 30, "month")
    }
}

fn format_hours(ms: u64) -> String {
    plural(i64::try_from(ms / 3_600_000).unwrap_or(i64::MAX), "hour")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Renders the prompt asking a language model to title and summarise `era`.
#[must_use]
pub fn build_era_prompt(era: &Era, artist_limit: usize, track_limit: usize) -> String {
    let start_month = era.start_date().format("%B %Y").to_string();
    let end_month = era.end_date().format("%B %Y").to_string();
    let date_range = if start_month == end_month {
        start_month
    } else {
        format!("{start_month} - {end_month}")
    };

    let artists = era
        .top_artists()
        .iter()
        .take(artist_limit)
        .enumerate()
        .map(|(i, a)| format!("{}. {} ({} plays)", i + 1, a.name, a.plays))
        .collect::<Vec<_>>()
        .join("\n");

    let tracks = era
        .top_tracks()
        .iter()
        .take(track_limit)
        .enumerate()
        .map(|(i, t)| format!("{}. {} by {} ({} plays)", i + 1, t.track_name, t.artist_name, t.plays))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are analyzing someone's music listening history. Based on this era's data, create a creative title and summary.

Era: {date_range} ({duration})
Total listening time: {hours}

Top Artists:
{artists}

Top Tracks:
{tracks}

Create a JSON response with:
- \"title\": A creative, evocative 2-5 word title that captures the mood/vibe. Avoid generic titles like \"Musical Journey\", \"Eclectic Mix\", or \"Summer Vibes\".
- \"summary\": A 2-3 sentence summary describing the musical mood, themes, or story of this era.

Respond ONLY with valid JSON: {{\"title\": \"...\", \"summary\": \"...\"}}",
        duration = format_duration(era.duration_days()),
        hours = format_hours(era.total_ms_played()),
    )
}

/// Extracts the title and summary from a model reply.
///
/// Accepts a bare JSON object, optionally wrapped in a Markdown code fence
/// or surrounded by prose.
///
/// # Errors
///
/// Returns [`NamingError::MalformedResponse`] when no object with a
/// non-empty `title` and a `summary` can be found.
pub fn parse_naming_response(reply: &str) -> Result<EraName, NamingError> {
    let malformed = || NamingError::MalformedResponse(reply.trim().chars().take(80).collect());

    let start = reply.find('{').ok_or_else(malformed)?;
    let end = reply.rfind('}').ok_or_else(malformed)?;
    if end < start {
        return Err(malformed());
    }

    let name: EraName = serde_json::from_str(&reply[start..=end]).map_err(|_| malformed())?;
    if name.title.trim().is_empty() {
        return Err(malformed());
    }

    Ok(EraName {
        title: name.title.trim().trim_matches('"').to_string(),
        summary: name.summary.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtistPlays, EraParts, TrackPlays};
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn sample_era() -> Era {
        Era::from(EraParts {
            id: 2,
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2021, 5, 30).unwrap(),
            weeks: 4..17,
            top_artists: vec![
                ArtistPlays { name: "Grouper".into(), plays: 40 },
                ArtistPlays { name: "Low".into(), plays: 12 },
            ],
            top_tracks: vec![TrackPlays {
                track_name: "Heavy Water".into(),
                artist_name: "Grouper".into(),
                plays: 9,
            }],
            total_ms_played: 7_200_000,
        })
    }

    struct Scripted {
        replies: Vec<Result<String, NamingError>>,
        calls: Cell<usize>,
    }

    impl Completion for Scripted {
        fn complete(&self, _prompt: &str) -> Result<String, NamingError> {
            let i = self.calls.get();
            self.calls.set(i + 1);
            self.replies[i.min(self.replies.len() - 1)].clone()
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(7), "7 days");
        assert_eq!(format_duration(13), "13 days");
        assert_eq!(format_duration(14), "2 weeks");
        assert_eq!(format_duration(59), "8 weeks");
        assert_eq!(format_duration(60), "2 months");
        assert_eq!(format_duration(45), "6 weeks");
        assert_eq!(format_duration(30 * 13), "13 months");
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_era_prompt(&sample_era(), 5, 10);

        assert!(prompt.contains("Era: March 2021 - May 2021 (3 months)"));
        assert!(prompt.contains("Total listening time: 2 hours"));
        assert!(prompt.contains("1. Grouper (40 plays)\n2. Low (12 plays)"));
        assert!(prompt.contains("1. Heavy Water by Grouper (9 plays)"));
        assert!(prompt.contains(r#"{"title": "...", "summary": "..."}"#));
    }

    #[test]
    fn test_prompt_respects_limits() {
        let prompt = build_era_prompt(&sample_era(), 1, 10);
        assert!(prompt.contains("1. Grouper"));
        assert!(!prompt.contains("2. Low"));
    }

    #[test]
    fn test_parse_plain_and_fenced_replies() {
        let plain = parse_naming_response(r#"{"title": "Underwater Hymns", "summary": "Hazy."}"#).unwrap();
        assert_eq!(plain.title, "Underwater Hymns");

        let fenced = parse_naming_response("```json\n{\"title\": \"Tape Hiss\", \"summary\": \"Lo-fi.\"}\n```").unwrap();
        assert_eq!(fenced.title, "Tape Hiss");
        assert_eq!(fenced.summary, "Lo-fi.");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_naming_response("I cannot help with that"),
            Err(NamingError::MalformedResponse(_))
        ));
        assert!(parse_naming_response(r#"{"title": "", "summary": "x"}"#).is_err());
        assert!(parse_naming_response(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn test_retry_policy_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_retries_only_retryable_errors() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        };

        let calls = Cell::new(0);
        let result: Result<(), _> = policy.run(|| {
            calls.set(calls.get() + 1);
            Err(NamingError::Unavailable("rate limit".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);

        calls.set(0);
        let result: Result<(), _> = policy.run(|| {
            calls.set(calls.get() + 1);
            Err(NamingError::Failed("no api key".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_completion_namer_recovers_after_transient_failure() {
        let namer = CompletionNamer::new(
            Scripted {
                replies: vec![
                    Err(NamingError::Unavailable("503".into())),
                    Ok(r#"{"title": "Heavy Water Season", "summary": "Slow and foggy."}"#.into()),
                ],
                calls: Cell::new(0),
            },
            5,
            10,
        );
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        };
        let mut eras = vec![sample_era()];

        let named = name_eras(&mut eras, &namer, &policy);

        assert_eq!(named, 1);
        assert_eq!(eras[0].title(), "Heavy Water Season");
        assert_eq!(eras[0].summary(), "Slow and foggy.");
    }

    #[test]
    fn test_failed_naming_falls_back() {
        let namer = CompletionNamer::new(
            Scripted {
                replies: vec![Ok("no json here".into())],
                calls: Cell::new(0),
            },
            5,
            10,
        );
        let mut eras = vec![sample_era()];
        let before = eras[0].clone();

        let named = name_eras(&mut eras, &namer, &RetryPolicy::none());

        assert_eq!(named, 0);
        assert_eq!(eras[0].title(), "Era 3");
        assert_eq!(eras[0].top_artists(), before.top_artists());
        assert_eq!(eras[0].start_date(), before.start_date());
    }

    #[test]
    fn test_heuristic_namer() {
        let name = HeuristicNamer.name(&sample_era()).unwrap();
        assert_eq!(name.title, "Grouper & Low");
        assert!(name.summary.starts_with("2 hours of listening across 3 months."));
        assert!(name.summary.contains("\"Heavy Water\" by Grouper"));
    }
}
