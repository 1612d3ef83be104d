//! Splits a personal music listening history into listening "eras".
//!
//! Core modules:
//! - [`aggregate`] - Group plays into ISO-week buckets
//! - [`similarity`] - Week-to-week taste similarity
//! - [`boundary`] - Detect where a new era starts
//! - [`era`] - Merge runs of weeks into eras
//! - [`pipeline`] - All of the above in one call
//!
//! ### Supporting Modules
//!
//! - [`ingest`] - Spotify extended streaming history parsing
//! - [`naming`] - Era titles and summaries (pluggable namers, LLM prompt)
//! - [`playlist`] - Representative playlists per era
//! - [`config`] - Tunable parameters and config file loading
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`report`] - Text and JSON output
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use eras::{config::SegmentConfig, ingest, naming, pipeline};
//! use std::path::PathBuf;
//!
//! let config = SegmentConfig::default();
//! let files = ingest::collect_export_files(&[PathBuf::from("my_spotify_data")])?;
//! let events = ingest::load_exports(&files, config.min_ms_played)?;
//!
//! let mut segmentation = pipeline::segment_history(&events, &config)?;
//! naming::name_eras(
//!     &mut segmentation.eras,
//!     &naming::HeuristicNamer,
//!     &naming::RetryPolicy::none(),
//! );
//!
//! for era in &segmentation.eras {
//!     println!("{}: {} to {}", era.title(), era.start_date(), era.end_date());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Algorithm Details
//!
//! 1. Every play is counted into the bucket of its ISO week (year-boundary
//!    weeks keep their ISO year, so 2024-12-30 lands in 2025-W01).
//! 2. Consecutive weeks are compared by the Jaccard index of their top
//!    artists (at most 20, cut to the smaller week's artist count).
//! 3. A week opens a new era when more than 28 days separate it from the
//!    previous active week, or when its similarity falls strictly below
//!    the threshold (default 0.3).
//! 4. Each run of weeks becomes an era with merged artist and track counts
//!    ranked by plays.
//!
//! All four steps are pure and deterministic; the same history and
//! threshold always give the same eras.
//!
//! ## Error Handling
//!
//! Segmentation never fails on degenerate input except for one case: an
//! empty history yields [`error::SegmentError::NoEras`], which callers
//! should report as "no distinct listening eras found" rather than as a
//! crash.

pub mod aggregate;
pub mod boundary;
pub mod cli;
pub mod completion;
pub mod config;
pub mod era;
pub mod error;
pub mod ingest;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod playlist;
pub mod report;
pub mod similarity;
pub mod tally;
