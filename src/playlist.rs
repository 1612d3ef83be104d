//! Representative playlists for eras.
//!
//! A playlist is the era's most played tracks in rank order. Track URIs
//! are not part of the era statistics, so they are looked up in a
//! [`TrackCatalog`] built from the same listening history.

use crate::models::{Era, ListeningEvent, TrackKey};
use serde::Serialize;
use std::collections::HashMap;

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistTrack {
    pub track_name: String,
    pub artist_name: String,
    pub uri: Option<String>,
}

/// Playlist for one era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub era_id: usize,
    pub tracks: Vec<PlaylistTrack>,
}

impl Playlist {
    /// URIs of the tracks that have one, in playlist order.
    pub fn uris(&self) -> impl Iterator<Item = &str> + '_ {
        self.tracks.iter().filter_map(|t| t.uri.as_deref())
    }
}

/// Track URI lookup keyed by (track, artist).
#[derive(Debug, Clone, Default)]
pub struct TrackCatalog {
    uris: HashMap<TrackKey, String>,
}

impl TrackCatalog {
    /// Indexes the first URI seen for every track.
    #[must_use]
    pub fn from_events(events: &[ListeningEvent]) -> Self {
        let mut uris = HashMap::new();
        for event in events {
            if let Some(uri) = event.track_uri.as_deref().filter(|u| !u.is_empty()) {
                uris.entry(TrackKey::new(&event.track_name, &event.artist_name))
                    .or_insert_with(|| uri.to_string());
            }
        }
        Self { uris }
    }

    #[must_use]
    pub fn uri(&self, key: &TrackKey) -> Option<&str> {
        self.uris.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// The `length` most played tracks of `era`, with URIs where known.
#[must_use]
pub fn build_playlist(era: &Era, catalog: &TrackCatalog, length: usize) -> Playlist {
    let tracks = era
        .top_tracks()
        .iter()
        .take(length)
        .map(|t| {
            let key = TrackKey::new(&t.track_name, &t.artist_name);
            PlaylistTrack {
                uri: catalog.uri(&key).map(str::to_string),
                track_name: key.track_name,
                artist_name: key.artist_name,
            }
        })
        .collect();

    Playlist {
        era_id: era.id(),
        tracks,
    }
}
