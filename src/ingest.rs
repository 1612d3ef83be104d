//! # Ingestion Module
//!
//! Reads Spotify "extended streaming history" exports into
//! [`ListeningEvent`]s. An export is a JSON array of play objects:
//!
//! ```json
//! [{
//!   "ts": "2023-04-01T18:22:11Z",
//!   "ms_played": 215000,
//!   "master_metadata_track_name": "Lullaby",
//!   "master_metadata_album_artist_name": "Low",
//!   "spotify_track_uri": "spotify:track:..."
//! }]
//! ```
//!
//! Plays are skipped when the track or artist is missing (podcasts,
//! audiobooks), when they ran shorter than the minimum play time, or when
//! the timestamp is missing or unparsable. Repeated (ts, track, artist)
//! entries are kept once.

use crate::error::ParseError;
use crate::models::ListeningEvent;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of an export as it appears on disk. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawPlay {
    ts: Option<String>,
    #[serde(default)]
    ms_played: i64,
    master_metadata_track_name: Option<String>,
    master_metadata_album_artist_name: Option<String>,
    spotify_track_uri: Option<String>,
}

/// Parses one export file's content.
///
/// # Errors
///
/// Returns [`ParseError::Json`] for malformed JSON and
/// [`ParseError::NotAnArray`] when the top-level value is not an array.
/// Individual bad entries are skipped, never reported.
pub fn parse_export(content: &[u8], min_ms_played: u64) -> Result<Vec<ListeningEvent>, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(content)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(ParseError::NotAnArray);
    };

    let total = entries.len();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut events = Vec::new();

    for entry in entries {
        let raw: RawPlay = match serde_json::from_value(entry) {
            Ok(raw) => raw,
            Err(e) => {
                trace!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        let (Some(track), Some(artist), Some(ts)) = (
            raw.master_metadata_track_name,
            raw.master_metadata_album_artist_name,
            raw.ts,
        ) else {
            continue;
        };

        let Ok(ms_played) = u64::try_from(raw.ms_played) else {
            continue;
        };
        if ms_played < min_ms_played {
            continue;
        }

        let Ok(timestamp) = DateTime::parse_from_rfc3339(&ts) else {
            trace!("Skipping entry with invalid timestamp {ts:?}");
            continue;
        };

        if !seen.insert((ts, track.clone(), artist.clone())) {
            continue;
        }

        events.push(ListeningEvent {
            timestamp: timestamp.with_timezone(&Utc),
            artist_name: artist,
            track_name: track,
            ms_played,
            track_uri: raw.spotify_track_uri.filter(|uri| !uri.is_empty()),
        });
    }

    debug!("Kept {} of {} export entries", events.len(), total);
    Ok(events)
}

/// Reads and parses one export file.
///
/// # Errors
///
/// Fails on I/O errors and on the conditions of [`parse_export`].
pub fn load_export(path: &Path, min_ms_played: u64) -> Result<Vec<ListeningEvent>, ParseError> {
    let content = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_export(&content, min_ms_played)
}

/// Reads several export files in parallel and merges them into one
/// chronological history.
///
/// Plays that appear in more than one file are kept once. Plays sharing a
/// timestamp keep the order of `paths`.
///
/// # Errors
///
/// Fails with [`ParseError::InFile`] naming the first file that could not
/// be loaded.
pub fn load_exports(paths: &[PathBuf], min_ms_played: u64) -> Result<Vec<ListeningEvent>, ParseError> {
    let per_file = paths
        .par_iter()
        .map(|path| {
            load_export(path, min_ms_played).map_err(|e| ParseError::InFile {
                path: path.clone(),
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut events: Vec<ListeningEvent> = per_file
        .into_iter()
        .flatten()
        .filter(|event| {
            seen.insert((
                event.timestamp,
                event.track_name.clone(),
                event.artist_name.clone(),
            ))
        })
        .collect();
    events.sort_by_key(|event| event.timestamp);

    debug!("Loaded {} events from {} files", events.len(), paths.len());
    Ok(events)
}

/// Expands directories into the `.json` files they contain (sorted by
/// name, not recursive). Plain file paths are passed through.
///
/// # Errors
///
/// Fails if a directory cannot be listed.
pub fn collect_export_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ParseError> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let io_err = |source| ParseError::Io {
            path: path.clone(),
            source,
        };
        let mut found: Vec<PathBuf> = fs::read_dir(path)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        files.extend(found);
    }

    Ok(files)
}
