//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Eras using Clap derive macros.
//!
//! ## Commands
//!
//! - `segment`: Split a listening history into eras
//! - `weeks`: Show the weekly aggregates the eras are built from
//! - `prompt`: Print the naming prompt an LLM would receive for each era
//! - `playlist`: Print the representative playlist of one era
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! eras segment ~/Downloads/my_spotify_data/
//! eras segment Streaming_History_Audio_2022.json --threshold 0.2 --name
//! eras playlist ~/Downloads/my_spotify_data/ --era 3 --format json
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Output format for listings
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum Format {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "eras")]
#[command(about = "Eras: split a music listening history into distinct listening eras")]
#[command(version)]
pub struct Args {
    /// Path to a JSON config file
    ///
    /// Defaults to `eras/config.json` in the platform config directory.
    /// A missing file means built-in defaults.
    #[arg(long, global = true, env = "ERAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Input and tuning options shared by every analysis command.
#[derive(ClapArgs, Debug, Clone)]
pub struct HistoryArgs {
    /// Streaming history export files, or directories containing them
    ///
    /// Directories are scanned (non-recursively) for `.json` files.
    #[arg(required = true, value_hint = clap::ValueHint::AnyPath)]
    pub inputs: Vec<PathBuf>,

    /// Similarity threshold between 0.0 and 1.0
    ///
    /// Lower values produce more, smaller eras; higher values fewer,
    /// larger ones.
    #[arg(short, long, env = "ERAS_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Minimum milliseconds a play must last to count
    #[arg(long, env = "ERAS_MIN_MS_PLAYED")]
    pub min_ms_played: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a listening history into eras
    ///
    /// Groups plays by ISO week, compares consecutive weeks by their top
    /// artists, and starts a new era on a taste shift or after more than
    /// four weeks of silence.
    Segment {
        #[command(flatten)]
        history: HistoryArgs,

        /// Attach offline titles and summaries to each era
        #[arg(long)]
        name: bool,
    },

    /// Show the weekly aggregates eras are built from
    Weeks {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Print the naming prompt for each era
    ///
    /// This is the text an external language model receives to title and
    /// summarise an era.
    Prompt {
        #[command(flatten)]
        history: HistoryArgs,

        /// Only print the prompt for this era id
        #[arg(long)]
        era: Option<usize>,
    },

    /// Print the representative playlist of one era
    Playlist {
        #[command(flatten)]
        history: HistoryArgs,

        /// Era id as shown by `eras segment`
        #[arg(long)]
        era: usize,

        /// Number of tracks
        #[arg(long)]
        length: Option<usize>,
    },

    /// Generate shell completions
    ///
    /// Usage: eras completion bash > ~/.local/share/bash-completion/completions/eras
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Command {
    /// History options of the analysis commands.
    #[must_use]
    pub fn history(&self) -> Option<&HistoryArgs> {
        match self {
            Self::Segment { history, .. }
            | Self::Weeks { history }
            | Self::Prompt { history, .. }
            | Self::Playlist { history, .. } => Some(history),
            Self::Completion { .. } => None,
        }
    }
}
