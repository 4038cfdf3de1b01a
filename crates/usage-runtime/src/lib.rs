//! Runtime layer for the usage report tools.
//!
//! Runs report configurations: parallel file processing on tokio's blocking
//! pool, per-period aggregation and cross-period comparison.

pub mod batch;
pub mod session;

pub use usage_core as core;
pub use usage_data as data;
