//! Dataset registry: discover which yearly files are available.
//!
//! The registry is stateless; every call re-reads the directory so the year
//! list always reflects current contents.

use std::path::Path;

use crate::data::DataError;

const DATASET_EXT: &str = "csv";

/// List available year identifiers in `dir`, sorted ascending.
///
/// A year identifier is the stem of a `*.csv` file (`2019.csv` → `"2019"`).
/// An empty directory (or one with no CSV files) yields an empty list, not an
/// error; callers must handle that case (e.g., disable year selection).
pub fn list_years(dir: &Path) -> Result<Vec<String>, DataError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DataError::SourceUnavailable {
        dir: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut years = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::SourceUnavailable {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_dataset = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(DATASET_EXT));
        if !is_dataset {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            years.push(stem.to_string());
        }
    }

    years.sort();
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"Country\n").unwrap();
    }

    #[test]
    fn lists_only_csv_stems_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "2019.csv");
        touch(tmp.path(), "2017.csv");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "2018.CSV");

        let years = list_years(tmp.path()).unwrap();
        assert_eq!(years, vec!["2017", "2018", "2019"]);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let years = list_years(tmp.path()).unwrap();
        assert!(years.is_empty());
    }

    #[test]
    fn missing_directory_is_source_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("no-such-dir");
        match list_years(&gone) {
            Err(DataError::SourceUnavailable { dir, .. }) => assert_eq!(dir, gone),
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn subdirectories_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("2016.csv")).unwrap();
        touch(tmp.path(), "2017.csv");

        let years = list_years(tmp.path()).unwrap();
        assert_eq!(years, vec!["2017"]);
    }
}
