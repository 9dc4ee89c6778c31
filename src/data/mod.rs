//! Data access: dataset registry, column mapping, loading and normalization.
//!
//! - year discovery (`registry`)
//! - static raw→canonical rename tables (`mapping`)
//! - CSV loading behind a capability trait (`loader`)
//! - schema normalization + validation (`normalize`)
//! - synthetic demo datasets (`sample`)

use std::path::PathBuf;

pub mod loader;
pub mod mapping;
pub mod normalize;
pub mod registry;
pub mod sample;

pub use loader::{CsvLoader, TableLoader};
pub use mapping::{ColumnMap, YearMap};
pub use normalize::Normalizer;
pub use registry::list_years;

/// Core data-layer failures.
///
/// A dataset that loads fine but lacks required columns is *not* in this
/// taxonomy: that outcome is `ValidationResult::Invalid`, which callers
/// branch on rather than propagate.
#[derive(Debug, Clone)]
pub enum DataError {
    /// The data directory is missing or unreadable. Fatal to the whole
    /// session; nothing can be listed or loaded.
    SourceUnavailable { dir: PathBuf, message: String },
    /// One year's file is malformed or unreadable. Scoped to that selection;
    /// other years stay usable.
    Load { year: String, message: String },
    /// Caller asked for a year the registry does not currently list.
    /// Indicates a stale selection (a caller bug), not a user-facing state.
    UnknownYear(String),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::SourceUnavailable { dir, message } => {
                write!(f, "Data directory '{}' is unavailable: {message}", dir.display())
            }
            DataError::Load { year, message } => {
                write!(f, "Failed to load dataset for {year}: {message}")
            }
            DataError::UnknownYear(year) => {
                write!(f, "Year '{year}' is not in the dataset registry.")
            }
        }
    }
}

impl std::error::Error for DataError {}
