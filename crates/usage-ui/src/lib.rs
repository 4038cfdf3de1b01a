//! Terminal UI layer for the usage report tools.
//!
//! Provides themes, utilization bars, the report header, the server and
//! comparison views, and the dashboard event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod comparison_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use usage_core as core;
