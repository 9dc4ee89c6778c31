//! Table loading behind a capability trait.
//!
//! The normalizer never touches the filesystem directly: it is handed a
//! `TableLoader`, so tests can feed it in-memory tables and the production
//! path stays a thin CSV adapter.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::data::DataError;
use crate::domain::{Cell, Table};

/// Capability to produce the raw table for a year.
pub trait TableLoader {
    fn load(&self, year: &str) -> Result<Table, DataError>;
}

/// Production loader: reads `<dir>/<year>.csv`.
///
/// The first row is the header of raw column names; each subsequent row is
/// one country record. Cells parse to `Number` when they read as a finite
/// float, `Missing` when empty, `Text` otherwise.
///
/// Rows are squared to the header width: short rows pad with `Missing`,
/// over-wide rows drop their headerless trailing fields. Cells beyond the
/// header have no column name and could never be addressed anyway.
pub struct CsvLoader {
    dir: PathBuf,
}

impl CsvLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, year: &str) -> PathBuf {
        self.dir.join(format!("{year}.csv"))
    }
}

impl TableLoader for CsvLoader {
    fn load(&self, year: &str) -> Result<Table, DataError> {
        let path = self.path_for(year);
        let file = File::open(&path).map_err(|e| DataError::Load {
            year: year.to_string(),
            message: format!("failed to open '{}': {e}", path.display()),
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| DataError::Load {
            year: year.to_string(),
            message: format!("failed to read CSV headers: {e}"),
        })?;
        let columns: Vec<String> = headers.iter().map(clean_header).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| DataError::Load {
                year: year.to_string(),
                message: format!("CSV parse error: {e}"),
            })?;
            rows.push(parse_record(&record, columns.len()));
        }

        Ok(Table::new(columns, rows))
    }
}

fn clean_header(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿Country"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Square a record to the header width: pad short rows with `Missing`, drop
/// headerless trailing fields from over-wide ones.
fn parse_record(record: &StringRecord, width: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(width);
    for i in 0..width {
        let field = record.get(i).map(str::trim).unwrap_or("");
        cells.push(parse_cell(field));
    }
    cells
}

fn parse_cell(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Missing;
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_header_and_typed_cells() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("2019.csv"),
            "Country or region,Score,Overall rank\nFinland,7.769,1\nDenmark,,2\n",
        )
        .unwrap();

        let table = CsvLoader::new(tmp.path()).load("2019").unwrap();
        assert_eq!(table.columns, vec!["Country or region", "Score", "Overall rank"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows[0][0], Cell::Text("Finland".to_string()));
        assert_eq!(table.rows[0][1], Cell::Number(7.769));
        assert_eq!(table.rows[1][1], Cell::Missing);
    }

    #[test]
    fn bom_on_first_header_is_stripped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("2019.csv"), "\u{feff}Country,Score\nX,1.0\n").unwrap();

        let table = CsvLoader::new(tmp.path()).load("2019").unwrap();
        assert_eq!(table.columns[0], "Country");
    }

    #[test]
    fn missing_file_is_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        match CsvLoader::new(tmp.path()).load("2042") {
            Err(DataError::Load { year, .. }) => assert_eq!(year, "2042"),
            other => panic!("expected Load error, got {other:?}"),
        }
    }

    #[test]
    fn over_wide_rows_drop_headerless_fields() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("2018.csv"),
            "Country,Score\nX,5.1,stray,fields\nY,6.2\n",
        )
        .unwrap();

        let table = CsvLoader::new(tmp.path()).load("2018").unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0][1], Cell::Number(5.1));
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("2018.csv"), "Country,Score,Generosity\nX,5.1\n").unwrap();

        let table = CsvLoader::new(tmp.path()).load("2018").unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Missing);
    }
}
