//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::DateRange;
use crate::models::{Category, Period};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GuestPulse - guest-feedback analytics for hotel satisfaction surveys
///
/// Reads exported reviews and the question/composite catalog, computes
/// overall, composite and per-question rating averages by period, and
/// writes a Markdown or JSON report.
///
/// Examples:
///   guestpulse --reviews reviews.json --catalog catalog.json
///   guestpulse --reviews exports/ --catalog catalog.json --period weekly --month 3
///   guestpulse --reviews reviews.json --catalog catalog.json --category f&b --year 2024
///   guestpulse --reviews reviews.json --catalog catalog.json --composite Cleanliness \
///       --compare-a 2024-01-01..2024-01-31 --compare-b 2024-02-01..2024-02-29
///   guestpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Review export: a JSON file or a directory of JSON files
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "GUESTPULSE_REVIEWS",
        required_unless_present = "init_config"
    )]
    pub reviews: Option<PathBuf>,

    /// Catalog export holding questions and composites
    #[arg(
        long,
        value_name = "FILE",
        env = "GUESTPULSE_CATALOG",
        required_unless_present = "init_config"
    )]
    pub catalog: Option<PathBuf>,

    /// Survey category (room, f&b)
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Grouping period (yearly, monthly, weekly)
    #[arg(short, long, value_name = "PERIOD")]
    pub period: Option<Period>,

    /// Month (1-12) for weekly grouping
    #[arg(long, value_name = "MONTH")]
    pub month: Option<u32>,

    /// Restrict the analysis to one calendar year
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// Restrict the analysis to a date range (YYYY-MM-DD..YYYY-MM-DD)
    #[arg(long, value_name = "RANGE")]
    pub range: Option<DateRange>,

    /// Only report this composite (id or name)
    #[arg(long, value_name = "COMPOSITE")]
    pub composite: Option<String>,

    /// Add an over-time series for this question id
    #[arg(long, value_name = "QUESTION")]
    pub question: Option<String>,

    /// First comparison range (YYYY-MM-DD..YYYY-MM-DD)
    #[arg(long, value_name = "RANGE", requires = "compare_b")]
    pub compare_a: Option<DateRange>,

    /// Second comparison range (YYYY-MM-DD..YYYY-MM-DD)
    #[arg(long, value_name = "RANGE", requires = "compare_a")]
    pub compare_b: Option<DateRange>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Maximum rows in list sections (remarks, yes/no responses)
    #[arg(long, value_name = "COUNT")]
    pub max_rows: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .guestpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .guestpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err("Month must be between 1 and 12".to_string());
            }
        }

        if let Some(max_rows) = self.max_rows {
            if max_rows == 0 {
                return Err("Max rows must be at least 1".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(year), Some(range)) = (self.year, self.range) {
            if range.end < first_day(year) || range.start > last_day(year) {
                return Err(format!("Range {} does not overlap year {}", range, year));
            }
        }

        if let Some(ref reviews) = self.reviews {
            if !reviews.exists() {
                return Err(format!("Reviews path does not exist: {}", reviews.display()));
            }
        }

        if let Some(ref catalog) = self.catalog {
            if !catalog.is_file() {
                return Err(format!("Catalog file does not exist: {}", catalog.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` value; `--quiet` wins over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn first_day(year: i32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(chrono::NaiveDate::MIN)
}

fn last_day(year: i32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(chrono::NaiveDate::MAX)
}
