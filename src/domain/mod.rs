//! Shared domain types and the canonical dataset schema.

pub mod types;

pub use types::*;
