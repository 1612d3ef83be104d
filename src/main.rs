//! # Eras - Listening History Segmentation
//!
//! Reads Spotify extended streaming history exports and splits them into
//! listening eras: stretches of weeks with a consistent taste.
//!
//! ## Usage
//!
//! ```bash
//! # Segment a whole export directory
//! eras segment ~/Downloads/my_spotify_data/
//!
//! # Fewer, larger eras, with offline titles
//! eras segment ~/Downloads/my_spotify_data/ --threshold 0.15 --name
//!
//! # Inspect the weekly buckets
//! eras weeks Streaming_History_Audio_2023.json
//!
//! # Playlist for era 2 as JSON
//! eras playlist ~/Downloads/my_spotify_data/ --era 2 --format json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use eras::cli::{self, Command, Format, HistoryArgs};
use eras::config::{self, SegmentConfig};
use eras::error::SegmentError;
use eras::models::ListeningEvent;
use eras::naming::{self, HeuristicNamer, RetryPolicy};
use eras::pipeline::{segment_history, Segmentation};
use eras::playlist::{build_playlist, TrackCatalog};
use eras::{aggregate, completion, ingest, report};
use log::{debug, info};
use std::process::ExitCode;

/// Exit status for a history with no eras, kept apart from crashes (1).
const EXIT_NO_ERAS: u8 = 2;

/// Loads the config file and applies command-line overrides.
fn resolve_config(args: &cli::Args, history: &HistoryArgs) -> Result<SegmentConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => config::get_config_path()
            .map_err(|e| debug!("No default config path: {e}"))
            .ok(),
    };

    let mut config = match path {
        Some(path) => SegmentConfig::load(&path)?,
        None => SegmentConfig::default(),
    };

    if let Some(threshold) = history.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(min_ms) = history.min_ms_played {
        config.min_ms_played = min_ms;
    }
    config.validate()?;

    debug!("Using config: {config:?}");
    Ok(config)
}

fn load_history(history: &HistoryArgs, config: &SegmentConfig) -> Result<Vec<ListeningEvent>> {
    let files = ingest::collect_export_files(&history.inputs)
        .context("Failed to list streaming history files")?;
    if files.is_empty() {
        return Err(anyhow!("No .json export files found in the given paths"));
    }

    info!("Reading {} export files", files.len());
    let events = ingest::load_exports(&files, config.min_ms_played)
        .context("Failed to read streaming history")?;
    info!("Loaded {} plays", events.len());
    Ok(events)
}

fn segment(events: &[ListeningEvent], config: &SegmentConfig) -> Option<Segmentation> {
    match segment_history(events, config) {
        Ok(segmentation) => Some(segmentation),
        Err(SegmentError::NoEras) => None,
    }
}

fn no_eras() -> ExitCode {
    eprintln!("No distinct listening eras found.");
    eprintln!("The export contains no plays long enough to count; try a larger export");
    eprintln!("or a lower --min-ms-played.");
    ExitCode::from(EXIT_NO_ERAS)
}

/// Main entry point for the Eras application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the library.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug eras segment data/` - Enable debug logging
/// - `RUST_LOG=eras::boundary=trace eras segment data/` - Per-week similarity scores
fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = cli::Args::parse();

    if let Command::Completion { shell } = &args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(
            completion::shell_to_completion_shell(*shell),
            &mut cmd,
            &mut std::io::stdout(),
        );
        return Ok(ExitCode::SUCCESS);
    }

    let history = args
        .command
        .history()
        .ok_or_else(|| anyhow!("Command takes no listening history"))?;
    let config = resolve_config(&args, history)?;
    let events = load_history(history, &config)?;

    match &args.command {
        Command::Segment { history, name } => {
            let Some(mut segmentation) = segment(&events, &config) else {
                return Ok(no_eras());
            };
            if *name {
                naming::name_eras(&mut segmentation.eras, &HeuristicNamer, &RetryPolicy::none());
            }
            match history.format {
                Format::Text => print!("{}", report::render_segmentation(&segmentation)),
                Format::Json => println!("{}", report::to_json(&segmentation)?),
            }
        }
        Command::Weeks { history } => {
            let weeks = aggregate::aggregate_weeks(&events);
            match history.format {
                Format::Text => print!("{}", report::render_weeks(&weeks)),
                Format::Json => println!("{}", report::weeks_json(&weeks)?),
            }
        }
        Command::Prompt { era, .. } => {
            let Some(segmentation) = segment(&events, &config) else {
                return Ok(no_eras());
            };
            let selected: Vec<_> = segmentation
                .eras
                .iter()
                .filter(|e| era.map_or(true, |id| e.id() == id))
                .collect();
            if selected.is_empty() {
                return Err(anyhow!(
                    "No era {} (history has {} eras)",
                    era.unwrap_or_default(),
                    segmentation.eras.len()
                ));
            }
            for e in selected {
                println!("=== Era {} ===", e.id());
                println!(
                    "{}\n",
                    naming::build_era_prompt(e, config.prompt_artist_limit, config.prompt_track_limit)
                );
            }
        }
        Command::Playlist { history, era, length } => {
            let Some(segmentation) = segment(&events, &config) else {
                return Ok(no_eras());
            };
            let selected = segmentation.eras.get(*era).ok_or_else(|| {
                anyhow!("No era {era} (history has {} eras)", segmentation.eras.len())
            })?;
            let catalog = TrackCatalog::from_events(&events);
            let playlist = build_playlist(selected, &catalog, length.unwrap_or(config.playlist_length));
            match history.format {
                Format::Text => print!("{}", report::render_playlist(&playlist)),
                Format::Json => println!("{}", report::to_json(&playlist)?),
            }
        }
        Command::Completion { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}
