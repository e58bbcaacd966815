//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::chart::ChartMode;
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SprintChart - stacked story-point charts for sprint boards
///
/// Groups sprint issues by category and platform and writes a Highcharts
/// configuration (or a Markdown table) showing what was done since
/// yesterday, what is in progress and what is still open.
///
/// Examples:
///   sprintchart --input sprint.json
///   sprintchart --input sprint.json --format markdown --output -
///   sprintchart --jira --sprint 1042 --save-issues sprint.json
///   sprintchart --input sprint.json --now 2024-03-14T09:30:00+03:00
///   sprintchart --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Sprint JSON file with an `issues` array
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["jira", "init_config"],
        conflicts_with = "jira"
    )]
    pub input: Option<PathBuf>,

    /// Fetch issues from Jira instead of reading a file
    ///
    /// Uses the [jira] section of the config file. The password is read
    /// from JIRA_PASSWORD.
    #[arg(long)]
    pub jira: bool,

    /// Jira sprint id (overrides jira.sprint_code)
    #[arg(long, value_name = "ID", requires = "jira")]
    pub sprint: Option<u64>,

    /// Explicit JQL query (overrides the generated sprint query)
    #[arg(long, value_name = "JQL", requires = "jira")]
    pub query: Option<String>,

    /// Jira password for basic auth
    #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
    pub jira_password: Option<String>,

    /// Also write the fetched issues as sprint JSON
    #[arg(long, value_name = "FILE", requires = "jira")]
    pub save_issues: Option<PathBuf>,

    /// Output file path, `-` for stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Output format (highcharts, markdown)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Chart mode (open, legacy)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ChartMode>,

    /// Evaluate as of this RFC 3339 instant instead of the local clock
    #[arg(long, value_name = "TIME", value_parser = parse_instant)]
    pub now: Option<DateTime<FixedOffset>>,

    /// Hour before which yesterday's completions are still reported
    #[arg(long, value_name = "HOUR")]
    pub cutoff_hour: Option<u32>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sprintchart.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "SPRINTCHART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .sprintchart.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Highcharts configuration JSON (default)
    #[default]
    Highcharts,
    /// Markdown table
    Markdown,
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("invalid RFC 3339 time: {}", e))
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

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if let Some(hour) = self.cutoff_hour {
            if hour > 24 {
                return Err("Cutoff hour must be between 0 and 24".to_string());
            }
        }

        if self.output.as_deref() == Some("") {
            return Err("Output path must not be empty".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
