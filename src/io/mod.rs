//! Output helpers: rankings CSV and year-summary JSON exports.

pub mod export;

pub use export::*;
