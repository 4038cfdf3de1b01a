//! Shared domain layer for the usage report tools.
//!
//! Holds the canonical data model, the row normalizer that turns decoded
//! sheet rows into [`models::ServerRecord`]s, error types, display
//! formatting, CLI settings and the report draft/export types.

pub mod error;
pub mod formatting;
pub mod models;
pub mod normalizer;
pub mod report;
pub mod settings;

pub use error::{ReportError, Result};
