//! The `songpat` subcommands.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use songpat_patterns::{Dialect, compile_pattern};
use songpat_query::Query;

use crate::error::CliError;
use crate::songs::load_songs;

/// Pattern used by `filter` when none is given.
pub const DEFAULT_FILTER_PATTERN: &str = "<artist> - <title>";

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Format every song with a pattern, one line per song.
    Format {
        /// Display pattern, for example `<artist> - <title>`.
        pattern: String,
        /// JSON file holding an array of songs.
        songs: PathBuf,
        /// Output dialect (plain, path, markup, bracket-markup).
        #[arg(long, default_value_t = Dialect::Plain)]
        dialect: Dialect,
    },
    /// Print every combination a pattern yields for each song.
    Combinations {
        /// Display pattern, for example `<artist> - <title>`.
        pattern: String,
        /// JSON file holding an array of songs.
        songs: PathBuf,
        /// Output dialect (plain, path, markup, bracket-markup).
        #[arg(long, default_value_t = Dialect::Plain)]
        dialect: Dialect,
    },
    /// Print the songs matching a query.
    Filter {
        /// Library query, for example `&(genre=rock, #(length < 5 minutes))`.
        query: String,
        /// JSON file holding an array of songs.
        songs: PathBuf,
        /// Pattern used to display each matching song.
        #[arg(long, default_value = DEFAULT_FILTER_PATTERN)]
        pattern: String,
    },
    /// Print the tags a pattern references.
    Tags {
        /// Display pattern to inspect.
        pattern: String,
    },
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the pattern, query or songs file is invalid or
/// when writing to `out` fails.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Format {
            pattern,
            songs,
            dialect,
        } => {
            let formatter = compile_pattern(pattern, *dialect)?;
            for song in load_songs(songs)? {
                writeln!(out, "{}", formatter.format(&song))?;
            }
        }
        Command::Combinations {
            pattern,
            songs,
            dialect,
        } => {
            let formatter = compile_pattern(pattern, *dialect)?;
            for song in load_songs(songs)? {
                for line in formatter.format_all_combinations(&song) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        Command::Filter {
            query,
            songs,
            pattern,
        } => {
            let query = Query::parse(query)?;
            let formatter = compile_pattern(pattern, Dialect::Plain)?;
            let mut matched = 0_usize;
            for song in load_songs(songs)?.iter().filter(|song| query.search(*song)) {
                writeln!(out, "{}", formatter.format(song))?;
                matched += 1;
            }
            tracing::debug!(query = query.as_str(), matched, "filtered songs");
        }
        Command::Tags { pattern } => {
            let formatter = compile_pattern(pattern, Dialect::Plain)?;
            for tag in formatter.tags() {
                writeln!(out, "{tag}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
