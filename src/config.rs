//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.guestpulse.toml` files.

use crate::analysis::RollupPeriod;
use crate::cli::OutputFormat;
use crate::models::{Category, Period};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".guestpulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analytics scope settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "guestpulse_report.md".to_string()
}

/// Which slice of the data to analyse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Survey category.
    #[serde(default = "default_category")]
    pub category: Category,

    /// Grouping period for the charts.
    #[serde(default)]
    pub period: Period,

    /// Month (1-12) used for weekly grouping.
    #[serde(default = "default_month")]
    pub month: u32,

    /// Restrict to a single calendar year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Composite used as the headline series instead of all ratings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_composite: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            period: Period::default(),
            month: default_month(),
            year: None,
            overall_composite: None,
        }
    }
}

fn default_category() -> Category {
    Category::Room
}

fn default_month() -> u32 {
    1
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include per-question breakdowns for each composite.
    #[serde(default = "default_true")]
    pub include_breakdown: bool,

    /// Include the trend table.
    #[serde(default = "default_true")]
    pub include_trend: bool,

    /// Granularity of the trend table.
    #[serde(default)]
    pub trend: RollupPeriod,

    /// Include the year-at-a-glance section (per-question monthly matrix).
    #[serde(default = "default_true")]
    pub include_yearly: bool,

    /// Include yes/no question tallies and responses.
    #[serde(default = "default_true")]
    pub include_yes_no: bool,

    /// Include guest remarks.
    #[serde(default = "default_true")]
    pub include_issues: bool,

    /// Maximum rows in list sections.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_breakdown: true,
            include_trend: true,
            trend: RollupPeriod::default(),
            include_yearly: true,
            include_yes_no: true,
            include_issues: true,
            max_rows: default_max_rows(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_rows() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(category) = args.category {
            self.analytics.category = category;
        }
        if let Some(period) = args.period {
            self.analytics.period = period;
        }
        if let Some(month) = args.month {
            self.analytics.month = month;
        }
        if args.year.is_some() {
            self.analytics.year = args.year;
        }

        if let Some(max_rows) = args.max_rows {
            self.report.max_rows = max_rows;
        }
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.analytics.month) {
            bail!(
                "analytics.month must be between 1 and 12, got {}",
                self.analytics.month
            );
        }
        if self.report.max_rows == 0 {
            bail!("report.max_rows must be at least 1");
        }
        Ok(())
    }

    /// Zero-based month for the aggregation engine. Assumes a validated config.
    pub fn month0(&self) -> u32 {
        self.analytics.month.saturating_sub(1)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
