//! Command-line parsing for the happiness dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data/metric code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "whi", version, about = "World Happiness Index terminal dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the years available in the data directory.
    Years(SourceArgs),
    /// Print the year summary, a country breakdown, rankings and the score
    /// distribution, and optionally export them.
    Show(ViewArgs),
    /// Print rankings only (useful for scripting).
    Rank(ViewArgs),
    /// Write synthetic demo datasets in the raw yearly schemas.
    Sample(SampleArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `whi show`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ViewArgs),
}

/// Options shared by every command that reads the data directory.
#[derive(Debug, Parser, Clone)]
pub struct SourceArgs {
    /// Data directory holding one `<year>.csv` per year.
    ///
    /// Defaults to `WHI_DATA_DIR` from the environment (.env supported),
    /// falling back to `archive`.
    #[arg(long, value_name = "DIR")]
    pub data: Option<PathBuf>,
}

/// Common options for viewing a year.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Year to display (defaults to the latest available).
    #[arg(short = 'y', long)]
    pub year: Option<String>,

    /// Country to break down (defaults to the happiest of the year).
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Ranking size (clamped to 5..=10).
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the full ranking to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the year summary to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

/// Options for demo-data generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output directory for the generated CSVs.
    #[arg(long, value_name = "DIR", default_value = "archive")]
    pub out: PathBuf,

    /// Countries per yearly file.
    #[arg(short = 'n', long, default_value_t = 30)]
    pub countries: usize,

    /// Random seed for reproducible datasets.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
