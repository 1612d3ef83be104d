//! # Configuration Module
//!
//! Tunable parameters for segmentation, naming and playlist assembly, plus
//! the optional JSON config file they can be loaded from.
//!
//! ## Config File
//!
//! Eras looks for `config.json` in the platform-standard config directory:
//! - Linux: `~/.config/eras/config.json`
//! - macOS: `~/Library/Application Support/eras/config.json`
//! - Windows: `%APPDATA%\eras\config.json`
//!
//! A missing file is not an error; defaults are used instead. Any field
//! left out of the file keeps its default value.

use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default similarity threshold below which a new era starts.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// More than four calendar weeks without plays always starts a new era.
pub const DEFAULT_MAX_GAP_DAYS: i64 = 28;

/// Number of top artists compared between consecutive weeks.
pub const DEFAULT_TOP_ARTIST_LIMIT: usize = 20;

/// Plays shorter than 30 seconds are dropped during ingestion.
pub const DEFAULT_MIN_MS_PLAYED: u64 = 30_000;

/// Parameters for one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Lower values produce more, smaller eras
    pub similarity_threshold: f64,
    pub max_gap_days: i64,
    pub top_artist_limit: usize,
    pub min_ms_played: u64,
    pub playlist_length: usize,
    pub prompt_artist_limit: usize,
    pub prompt_track_limit: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_gap_days: DEFAULT_MAX_GAP_DAYS,
            top_artist_limit: DEFAULT_TOP_ARTIST_LIMIT,
            min_ms_played: DEFAULT_MIN_MS_PLAYED,
            playlist_length: 25,
            prompt_artist_limit: 5,
            prompt_track_limit: 10,
        }
    }
}

impl SegmentConfig {
    /// Default configuration with a custom similarity threshold.
    #[must_use]
    pub fn with_threshold(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
            ..Self::default()
        }
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is outside `[0.0, 1.0]` or a
    /// limit is zero.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.similarity_threshold),
            "similarity threshold must be between 0.0 and 1.0, got {}",
            self.similarity_threshold
        );
        ensure!(self.max_gap_days > 0, "max gap days must be positive");
        ensure!(self.top_artist_limit > 0, "top artist limit must be positive");
        ensure!(self.playlist_length > 0, "playlist length must be positive");
        ensure!(
            self.prompt_artist_limit > 0 && self.prompt_track_limit > 0,
            "prompt limits must be positive"
        );
        Ok(())
    }

    /// Loads a config file, or the defaults when `path` does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read, is not valid JSON, or
    /// holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid values in config file {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Returns the platform-appropriate config file path.
///
/// Unlike a data directory the config directory is never created here;
/// the file is optional.
///
/// # Errors
///
/// Returns an error if the system config directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use eras::config::get_config_path;
///
/// let path = get_config_path()?;
/// println!("Config location: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow!(
            "Could not determine system config directory. Pass --config to point at a config file."
        )
    })?;

    Ok(config_dir.join("eras").join("config.json"))
}
