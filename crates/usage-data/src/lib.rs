//! Data layer for the usage report tools.
//!
//! Decodes metric sheets, normalizes and processes each file, aggregates
//! files into per-period statistics and compares periods over time.

pub mod aggregator;
pub mod analysis;
pub mod processor;
pub mod reader;
pub mod trend;

pub use usage_core as core;
