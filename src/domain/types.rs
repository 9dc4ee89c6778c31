//! Shared domain types.
//!
//! These types are intentionally kept lightweight and (where exported)
//! serializable so they can be:
//!
//! - used in-memory while computing metrics
//! - exported to JSON/CSV
//! - reloaded later for comparisons across years

use serde::{Deserialize, Serialize};

/// Canonical column names every valid yearly dataset must expose.
///
/// These must stay in sync with the rename tables in `data::mapping`; the
/// normalizer validates against these names only, never against raw names.
pub const COL_COUNTRY: &str = "Country";
pub const COL_SCORE: &str = "Happiness Score";
pub const COL_ECONOMY: &str = "Economy (GDP per Capita)";
pub const COL_FAMILY: &str = "Family";
pub const COL_HEALTH: &str = "Health (Life Expectancy)";
pub const COL_FREEDOM: &str = "Freedom";
pub const COL_TRUST: &str = "Trust (Government Corruption)";
pub const COL_GENEROSITY: &str = "Generosity";

/// The six factor columns that decompose a happiness score.
pub const FACTOR_COLUMNS: [&str; 6] = [
    COL_ECONOMY,
    COL_FAMILY,
    COL_HEALTH,
    COL_FREEDOM,
    COL_TRUST,
    COL_GENEROSITY,
];

/// Expected scalar kind of a canonical column.
///
/// The kind is descriptive: validation checks column *presence* only, and the
/// report layer uses the kind when deciding how to read cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

/// One entry of the canonical schema descriptor.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// The fixed, year-independent required column set (ordered).
pub const REQUIRED_COLUMNS: [ColumnSpec; 8] = [
    ColumnSpec { name: COL_COUNTRY, kind: ColumnKind::Text },
    ColumnSpec { name: COL_SCORE, kind: ColumnKind::Number },
    ColumnSpec { name: COL_ECONOMY, kind: ColumnKind::Number },
    ColumnSpec { name: COL_FAMILY, kind: ColumnKind::Number },
    ColumnSpec { name: COL_HEALTH, kind: ColumnKind::Number },
    ColumnSpec { name: COL_FREEDOM, kind: ColumnKind::Number },
    ColumnSpec { name: COL_TRUST, kind: ColumnKind::Number },
    ColumnSpec { name: COL_GENEROSITY, kind: ColumnKind::Number },
];

/// One scalar cell of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// An in-memory table: ordered column names plus rows of scalar cells.
///
/// The same type carries both *raw* tables (as loaded) and *canonical* tables
/// (after renaming); the `ValidationResult::Valid` wrapper is the guarantee
/// that the required column set is present.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name.
    ///
    /// Normalization never produces duplicate canonical names, but raw files
    /// can carry duplicate headers; the rightmost occurrence wins then.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Numeric value of `name` in row `row`, if present and numeric.
    pub fn number(&self, row: usize, name: &str) -> Option<f64> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_number()
    }

    /// Text value of `name` in row `row`, if present and textual.
    pub fn text(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_text()
    }
}

/// Outcome of schema normalization.
///
/// `Invalid` is a first-class result, not an error: a structurally
/// incompatible dataset is an expected, user-facing condition the
/// presentation layer must branch on.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    Valid(Table),
    Invalid { missing: Vec<String> },
}

/// A `(country, score)` pair used for KPIs and rankings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryScore {
    pub country: String,
    pub score: f64,
}

/// Year-summary export schema (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSummary {
    pub tool: String,
    pub year: String,
    pub n_countries: usize,
    pub mean_score: f64,
    pub happiest: CountryScore,
    pub saddest: CountryScore,
    pub top: Vec<CountryScore>,
}

/// Clamp a requested ranking size to the supported window.
pub fn clamp_top_n(n: usize) -> usize {
    n.clamp(5, 10)
}
