//! Shared "year view" pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! registry -> loader -> normalizer -> metrics
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! `Invalid` results flow through untouched: branching on them is the
//! presentation layer's job.

use std::path::Path;

use crate::data::{ColumnMap, CsvLoader, DataError, Normalizer, list_years};
use crate::domain::{CountryScore, Table, ValidationResult, YearSummary};
use crate::report;

/// Everything the front-ends need to render one year.
#[derive(Debug, Clone)]
pub struct YearView {
    pub year: String,
    pub table: Table,
    pub stats: report::ScoreStats,
    /// Full ranking, score descending.
    pub ranked: Vec<CountryScore>,
    /// Sorted unique country names (selection list).
    pub countries: Vec<String>,
}

/// The consumer-facing `get_canonical_table`: registry membership check, then
/// load + normalize.
///
/// `UnknownYear` here means the caller's selection is stale relative to the
/// directory contents; it is a caller bug, not a user-facing dataset problem.
pub fn load_year(dir: &Path, year: &str, map: &ColumnMap) -> Result<ValidationResult, DataError> {
    let years = list_years(dir)?;
    if !years.iter().any(|y| y == year) {
        return Err(DataError::UnknownYear(year.to_string()));
    }

    let loader = CsvLoader::new(dir);
    Normalizer::new(map.clone()).normalize(year, &loader)
}

/// Build the metric bundle for a validated table.
///
/// Returns `None` when the table has no usable `(country, score)` rows.
pub fn build_view(year: &str, table: Table) -> Option<YearView> {
    let stats = report::compute_score_stats(&table)?;
    let ranked = report::rank_countries(&table);
    let countries = report::country_names(&table);
    Some(YearView {
        year: year.to_string(),
        table,
        stats,
        ranked,
        countries,
    })
}

/// Assemble the exportable summary for a view.
pub fn year_summary(view: &YearView, top_n: usize) -> YearSummary {
    YearSummary {
        tool: "whi".to_string(),
        year: view.year.clone(),
        n_countries: view.stats.n,
        mean_score: view.stats.mean,
        happiest: view.stats.happiest.clone(),
        saddest: view.stats.saddest.clone(),
        top: view.ranked.iter().take(top_n).cloned().collect(),
    }
}
