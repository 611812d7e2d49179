//! Command line configuration and default file locations

use crate::game::puzzle::DEFAULT_ROUND_SECONDS;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// System word list tried when no dictionary is configured
pub const SYSTEM_WORDS: &str = "/usr/share/dict/words";

/// A daily word-placement puzzle in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "scrabdle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Play today's puzzle (default)
    Play,
    /// Print the leaderboard for a day
    Leaderboard {
        /// Day to show, YYYY-MM-DD (today by default)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        /// Number of entries to show
        #[arg(long, default_value_t = crate::stats::DEFAULT_TOP_N)]
        limit: usize,
    },
    /// Register this device's player, or show the existing id
    Register,
}

#[derive(Debug, Clone, Args)]
pub struct Options {
    /// Word list, one word per line
    #[arg(long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `scrabdle=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Length of a round in seconds
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_ROUND_SECONDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub round_seconds: u32,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Play)
    }
}

/// Resolved file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub database: PathBuf,
    /// `None` means play with an empty dictionary
    pub dictionary: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Paths {
    /// Fill in anything not given on the command line from `data_dir`.
    pub fn resolve(options: &Options, data_dir: &Path) -> Self {
        Self {
            database: options
                .database
                .clone()
                .unwrap_or_else(|| data_dir.join("scrabdle.db")),
            dictionary: resolve_dictionary(
                options.dictionary.as_deref(),
                &[data_dir.join("words.txt"), PathBuf::from(SYSTEM_WORDS)],
            ),
            log_file: data_dir.join("scrabdle.log"),
        }
    }
}

/// An explicit path always wins, even if missing, so the error surfaces.
/// Otherwise the first candidate that exists.
fn resolve_dictionary(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    candidates.iter().find(|p| p.is_file()).cloned()
}
