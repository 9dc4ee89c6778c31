//! Export computed metrics to files.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: a flat rankings CSV and a `YearSummary` JSON (schema defined in
//! `domain`).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{CountryScore, YearSummary};
use crate::error::AppError;

/// Write the full ranking to a CSV file.
pub fn write_rankings_csv(path: &Path, year: &str, ranked: &[CountryScore]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create rankings CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "rank,year,country,happiness_score")
        .map_err(|e| AppError::new(2, format!("Failed to write rankings CSV header: {e}")))?;

    for (i, cs) in ranked.iter().enumerate() {
        writeln!(file, "{},{},{},{:.4}", i + 1, year, csv_field(&cs.country), cs.score)
            .map_err(|e| AppError::new(2, format!("Failed to write rankings CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a year summary JSON file.
pub fn write_summary_json(path: &Path, summary: &YearSummary) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Read a year summary JSON file (round-trip for downstream tooling).
pub fn read_summary_json(path: &Path) -> Result<YearSummary, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
