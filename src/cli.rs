//! Command-line interface for readaloud
//!
//! Provides argument parsing using clap derive macros.

use crate::config::{OutputFormat, SpeechBackend};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Read news articles aloud with synchronized highlighting
#[derive(Parser, Debug)]
#[command(
    name = "readaloud",
    version,
    about = "Read news articles aloud with synchronized highlighting"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a replay yield. Bare numbers are milliseconds.
///
/// Otherwise any `humantime` duration works: `50ms`, `1s`, `1s 200ms`.
fn parse_yield(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the sentences narration would read
    Segment {
        /// Article body (HTML)
        file: PathBuf,

        /// Print a JSON array instead of numbered lines
        #[arg(long)]
        json: bool,
    },

    /// Render the article once, passively or at a narration position
    Render {
        /// Article body (HTML)
        file: PathBuf,

        /// Related articles for "Read Also" cards (JSON array)
        #[arg(long, value_name = "JSON")]
        related: Option<PathBuf>,

        /// Highlight this sentence (zero-based); omit for passive mode
        #[arg(long, value_name = "N")]
        sentence: Option<usize>,

        /// Byte offset of the spoken word within the sentence
        #[arg(long, value_name = "C", requires = "sentence")]
        offset: Option<usize>,

        /// Output format: ansi or html (default from config)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },

    /// Narrate the article interactively
    Read {
        /// Article body (HTML)
        file: PathBuf,

        /// Related articles for "Read Also" cards (JSON array)
        #[arg(long, value_name = "JSON")]
        related: Option<PathBuf>,

        /// Speech backend: estimated or command
        #[arg(long, value_name = "BACKEND")]
        backend: Option<SpeechBackend>,

        /// Speaking rate in words per minute
        #[arg(long, value_name = "N")]
        wpm: Option<u32>,

        /// Pause between stop and restart on replay. Examples: 50, 50ms, 1s
        #[arg(long, value_name = "DURATION", value_parser = parse_yield)]
        replay_yield: Option<Duration>,

        /// Keep the session open after narration finishes
        #[arg(long)]
        stay: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}

/// Log filter for the verbosity flags. `-q` wins over `-v`.
pub fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
