use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use clap::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::models::ComparisonPeriod;

/// `YYYY-MM=file[,file...]`
static PERIOD_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{4})-(\d{1,2})\s*=\s*(.+)$").expect("period pattern is valid")
});

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate per-server usage metrics into dashboards and reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "usage-report",
    about = "Aggregate per-server usage metrics into dashboards and reports",
    version
)]
pub struct Settings {
    /// Metric files or directories for a single-period report
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Month of the single-period report (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Year of the single-period report (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Comparison period as YYYY-MM=FILE[,FILE...]; repeat in chronological order
    #[arg(long = "period", value_name = "YYYY-MM=FILES")]
    pub periods: Vec<String>,

    /// Report title (defaults to a title naming the period)
    #[arg(long)]
    pub title: Option<String>,

    /// Report summary (defaults to a sentence quoting idle utilization)
    #[arg(long)]
    pub summary: Option<String>,

    /// Write the report document as JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json", "text"])]
    pub format: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── ReportConfig ───────────────────────────────────────────────────────────────

/// One reporting period requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpec {
    pub id: String,
    pub month: u32,
    pub year: i32,
    pub files: Vec<PathBuf>,
}

impl PeriodSpec {
    /// An empty [`ComparisonPeriod`] awaiting its stats.
    pub fn to_period(&self) -> ComparisonPeriod {
        ComparisonPeriod::new(self.id.clone(), self.month, self.year, self.files.clone())
    }
}

/// Caller-owned description of a report run: which periods, in which order,
/// from which files, plus any title/summary overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Chronological; the last period is the current one.
    pub periods: Vec<PeriodSpec>,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl ReportConfig {
    /// `true` when more than one period is requested.
    pub fn is_comparison(&self) -> bool {
        self.periods.len() > 1
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the [`ReportConfig`] for this invocation.
    ///
    /// Positional files form a single period dated `--month`/`--year`, with
    /// missing parts taken from `today`. `--period` arguments form a
    /// comparison and cannot be combined with positional files.
    pub fn report_config(&self, today: NaiveDate) -> Result<ReportConfig> {
        let periods = if !self.periods.is_empty() {
            if !self.files.is_empty() {
                return Err(ReportError::Config(
                    "positional FILES cannot be combined with --period".to_string(),
                ));
            }
            let mut specs: Vec<PeriodSpec> = Vec::with_capacity(self.periods.len());
            for arg in &self.periods {
                let spec = parse_period_arg(arg)?;
                if specs.iter().any(|s| s.id == spec.id) {
                    return Err(ReportError::Config(format!(
                        "period {} given more than once",
                        spec.id
                    )));
                }
                specs.push(spec);
            }
            specs
        } else if self.files.is_empty() {
            return Err(ReportError::Config(
                "no input files given; pass FILES or --period".to_string(),
            ));
        } else {
            let month = self.month.unwrap_or_else(|| today.month());
            let year = self.year.unwrap_or_else(|| today.year());
            vec![PeriodSpec {
                id: format!("{:04}-{:02}", year, month),
                month,
                year,
                files: self.files.clone(),
            }]
        };

        Ok(ReportConfig {
            periods,
            title: self.title.clone(),
            summary: self.summary.clone(),
        })
    }
}

/// Parse a `YYYY-MM=file[,file...]` argument.
pub fn parse_period_arg(arg: &str) -> Result<PeriodSpec> {
    let caps = PERIOD_ARG.captures(arg).ok_or_else(|| {
        ReportError::Config(format!("invalid period '{}': expected YYYY-MM=FILE[,FILE...]", arg))
    })?;

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| ReportError::Config(format!("invalid year in period '{}'", arg)))?;
    let month: u32 = caps[2]
        .parse()
        .map_err(|_| ReportError::Config(format!("invalid month in period '{}'", arg)))?;
    if !(1..=12).contains(&month) {
        return Err(ReportError::Config(format!(
            "month must be 1-12 in period '{}'",
            arg
        )));
    }

    let files: Vec<PathBuf> = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PathBuf::from)
        .collect();
    if files.is_empty() {
        return Err(ReportError::Config(format!("period '{}' lists no files", arg)));
    }

    Ok(PeriodSpec {
        id: format!("{:04}-{:02}", year, month),
        month,
        year,
        files,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
