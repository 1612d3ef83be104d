//! Error types for the eras library.
//!
//! The segmentation stages themselves are total functions; the only
//! failure they report is [`SegmentError::NoEras`]. Ingestion and naming
//! have their own error types since they talk to files and external
//! services.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the segmentation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    /// There were no weeks to build eras from
    #[error("no distinct listening eras found")]
    NoEras,
}

/// Failure to read or decode a listening history export.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The file is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not an array of plays
    #[error("expected JSON array of listening events")]
    NotAnArray,

    /// The export file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file inside a multi-file load failed
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },
}

/// Failure reported by an era namer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Transient failure (rate limit, timeout, connection, 5xx); worth retrying
    #[error("naming service unavailable: {0}")]
    Unavailable(String),

    /// The namer answered with something that is not a title/summary object
    #[error("malformed naming response: {0}")]
    MalformedResponse(String),

    /// Permanent failure such as a missing API key
    #[error("naming failed: {0}")]
    Failed(String),
}

impl NamingError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
