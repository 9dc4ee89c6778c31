//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data directory
//! - runs the registry/normalizer pipeline
//! - prints reports or launches the TUI
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, SampleArgs, SourceArgs, ViewArgs};
use crate::data::sample::{SampleSpec, write_sample_datasets};
use crate::data::{ColumnMap, DataError, list_years};
use crate::domain::{ValidationResult, clamp_top_n};
use crate::error::AppError;
use crate::report;

pub mod pipeline;

/// Entry point for the `whi` binary.
pub fn run() -> Result<(), AppError> {
    // We want `whi` and `whi --data archive` to behave like `whi tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Years(args) => handle_years(args),
        Command::Show(args) => handle_view(args, OutputMode::Full),
        Command::Rank(args) => handle_view(args, OutputMode::RankOnly),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

/// Resolve the data directory: `--data` flag, else `WHI_DATA_DIR`, else the
/// original dataset folder name.
pub fn resolve_data_dir(args: &SourceArgs) -> PathBuf {
    if let Some(dir) = &args.data {
        return dir.clone();
    }
    dotenvy::dotenv().ok();
    match std::env::var("WHI_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("archive"),
    }
}

fn handle_years(args: SourceArgs) -> Result<(), AppError> {
    let dir = resolve_data_dir(&args);
    let years = list_years(&dir).map_err(app_error)?;
    if years.is_empty() {
        println!("No yearly datasets found in '{}'.", dir.display());
        return Ok(());
    }
    for year in years {
        println!("{year}");
    }
    Ok(())
}

fn handle_view(args: ViewArgs, mode: OutputMode) -> Result<(), AppError> {
    let dir = resolve_data_dir(&args.source);
    let year = select_year(&dir, args.year.as_deref())?;
    let top_n = clamp_top_n(args.top);

    let table = match pipeline::load_year(&dir, &year, &ColumnMap::builtin()).map_err(app_error)? {
        ValidationResult::Valid(table) => table,
        ValidationResult::Invalid { missing } => {
            // Structured, user-facing outcome: name the missing columns and
            // render nothing else.
            return Err(AppError::new(
                3,
                format!("Dataset {year} is missing required columns: {}.", missing.join(", ")),
            ));
        }
    };

    let Some(view) = pipeline::build_view(&year, table) else {
        return Err(AppError::new(3, format!("Dataset {year} has no usable country rows.")));
    };

    if mode == OutputMode::Full {
        println!("{}", report::format::format_year_summary(&view.year, &view.stats));

        let country = args
            .country
            .clone()
            .unwrap_or_else(|| view.stats.happiest.country.clone());
        match report::factor_breakdown(&view.table, &country) {
            Some(factors) => {
                let score = report::country_score(&view.table, &country);
                println!("{}", report::format::format_country_detail(&country, score, &factors));
            }
            None => println!("No data available for '{country}'.\n"),
        }
    }

    println!("{}", report::format::format_rankings(&view.ranked, top_n));

    if mode == OutputMode::Full {
        let correlations = report::factor_correlations(&view.table);
        if !correlations.is_empty() {
            println!("{}", report::format::format_correlations(&correlations));
        }

        let bins = report::score_histogram(&view.table, 20);
        println!("{}", report::format::format_histogram(&bins));
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_rankings_csv(path, &view.year, &view.ranked)?;
    }
    if let Some(path) = &args.export_summary {
        crate::io::write_summary_json(path, &pipeline::year_summary(&view, top_n))?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let written = write_sample_datasets(&SampleSpec {
        out_dir: args.out,
        countries: args.countries,
        seed: args.seed,
    })?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Pick the requested year, defaulting to the latest available.
pub fn select_year(dir: &Path, requested: Option<&str>) -> Result<String, AppError> {
    match requested {
        Some(year) => Ok(year.to_string()),
        None => {
            let years = list_years(dir).map_err(app_error)?;
            years.last().cloned().ok_or_else(|| {
                AppError::new(3, format!("No yearly datasets found in '{}'.", dir.display()))
            })
        }
    }
}

/// Map core data errors onto boundary exit codes.
pub fn app_error(err: DataError) -> AppError {
    let code = match err {
        DataError::SourceUnavailable { .. } | DataError::UnknownYear(_) => 2,
        DataError::Load { .. } => 3,
    };
    AppError::new(code, err.to_string())
}

/// Rewrite argv so `whi` defaults to `whi tui`.
///
/// Rules:
/// - `whi`                     -> `whi tui`
/// - `whi --data DIR ...`      -> `whi tui --data DIR ...`
/// - `whi --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "years" | "show" | "rank" | "sample" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
