//! Schema normalization and validation.
//!
//! This module turns a heterogeneous yearly table into the canonical schema,
//! or reports exactly which required columns cannot be produced.
//!
//! Design goals:
//! - **Pure, single pass**: the table is taken by value, renamed, validated;
//!   no loader-owned state is touched and nothing is retained across calls.
//! - **Pass-through**: columns that are neither required nor mapped survive
//!   untouched in name and content (forward-compatibility with datasets
//!   carrying extra fields).
//! - **Structured failure**: a missing-column outcome is a result variant,
//!   never an error; load failures propagate unchanged (no retry — a
//!   malformed dataset file is not transient).

use crate::data::mapping::ColumnMap;
use crate::data::{DataError, TableLoader};
use crate::domain::{REQUIRED_COLUMNS, Table, ValidationResult};

/// Applies the configured rename table for a year and validates the result
/// against the canonical required-column set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    map: ColumnMap,
}

impl Normalizer {
    pub fn new(map: ColumnMap) -> Self {
        Self { map }
    }

    /// Load the raw table for `year` and normalize it.
    ///
    /// A year absent from the column map is treated as already canonical
    /// (identity mapping). Validation checks canonical names only, so a
    /// dataset that satisfies the required set without any mapping entry
    /// validates successfully.
    pub fn normalize(
        &self,
        year: &str,
        loader: &dyn TableLoader,
    ) -> Result<ValidationResult, DataError> {
        let mut table = loader.load(year)?;

        if let Some(year_map) = self.map.get(year) {
            // When several renames share a canonical target, only the last one
            // whose raw column is present applies; the earlier raw columns
            // keep their raw names and pass through. This makes "the
            // later-applied rename wins" hold regardless of the raw column
            // order in the file.
            let mut winners: Vec<(&str, &str)> = Vec::new();
            for (raw, canonical) in &year_map.renames {
                if !table.columns.iter().any(|c| c == raw) {
                    continue;
                }
                winners.retain(|(_, c)| *c != canonical.as_str());
                winners.push((raw.as_str(), canonical.as_str()));
            }
            for (raw, canonical) in winners {
                for column in table.columns.iter_mut() {
                    if column == raw {
                        *column = canonical.to_string();
                    }
                }
            }
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|spec| !table.has_column(spec.name))
            .map(|spec| spec.name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(ValidationResult::Valid(table))
        } else {
            Ok(ValidationResult::Invalid { missing })
        }
    }
}
