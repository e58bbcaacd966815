//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sprintchart.toml` files.

use crate::analysis::DEFAULT_CUTOFF_HOUR;
use crate::chart::{ChartMode, ChartSettings};
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".sprintchart.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Jira data source settings.
    #[serde(default)]
    pub jira: JiraConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path (`-` for stdout).
    #[serde(default = "default_output")]
    pub output: String,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "sprint_chart.json".to_string()
}

/// Chart presentation and evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Aggregation shown on the chart.
    #[serde(default)]
    pub mode: ChartMode,

    /// DOM element id the chart renders into.
    #[serde(default = "default_render_to")]
    pub render_to: String,

    /// Chart title.
    #[serde(default)]
    pub title: String,

    /// Before this hour, yesterday's completions are still reported.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            mode: ChartMode::default(),
            render_to: default_render_to(),
            title: String::new(),
            cutoff_hour: default_cutoff_hour(),
        }
    }
}

fn default_render_to() -> String {
    "chart".to_string()
}

fn default_cutoff_hour() -> u32 {
    DEFAULT_CUTOFF_HOUR
}

impl ChartConfig {
    /// Presentation settings for the chart builder.
    pub fn settings(&self) -> ChartSettings {
        ChartSettings {
            render_to: self.render_to.clone(),
            title: self.title.clone(),
            ..ChartSettings::default()
        }
    }
}

/// Jira search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Jira base URL, e.g. `https://jira.example.com`.
    #[serde(default)]
    pub base_url: String,

    /// Login for basic auth. The password is read from `JIRA_PASSWORD`.
    #[serde(default)]
    pub login: String,

    /// Numeric sprint id.
    #[serde(default)]
    pub sprint_code: Option<u64>,

    /// Sprint start date (`YYYY-MM-DD`); earlier resolutions are skipped.
    #[serde(default)]
    pub start_date: String,

    /// Feature team filter.
    #[serde(default)]
    pub team: String,

    /// Explicit JQL; replaces the generated sprint query.
    #[serde(default)]
    pub query: Option<String>,

    /// Page size requested from the search API.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Custom field holding story points.
    #[serde(default = "default_story_points_field")]
    pub story_points_field: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login: String::new(),
            sprint_code: None,
            start_date: String::new(),
            team: String::new(),
            query: None,
            max_results: default_max_results(),
            timeout_seconds: default_timeout(),
            story_points_field: default_story_points_field(),
        }
    }
}

fn default_max_results() -> usize {
    500
}

fn default_timeout() -> u64 {
    30
}

fn default_story_points_field() -> String {
    "customfield_10212".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location in `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(mode) = args.mode {
            self.chart.mode = mode;
        }
        if let Some(cutoff) = args.cutoff_hour {
            self.chart.cutoff_hour = cutoff;
        }

        if let Some(code) = args.sprint {
            self.jira.sprint_code = Some(code);
        }
        if let Some(ref query) = args.query {
            self.jira.query = Some(query.clone());
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), String> {
        if self.chart.cutoff_hour > 24 {
            return Err("cutoff_hour must be between 0 and 24".to_string());
        }
        if self.jira.max_results == 0 {
            return Err("jira.max_results must be at least 1".to_string());
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
