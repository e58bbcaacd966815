//! Jira data source.
//!
//! Fetches a sprint board through the REST search API and converts it
//! into sprint issues.

pub mod client;
pub mod convert;
pub mod models;

pub use client::{build_jql, JiraClient};
pub use convert::convert_search;

use crate::config::JiraConfig;
use crate::models::Sprint;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Fetch and convert the configured sprint.
pub async fn fetch_sprint(
    config: &JiraConfig,
    password: Option<String>,
    show_progress: bool,
) -> Result<Sprint> {
    let jql = build_jql(config)?;
    let client = JiraClient::new(config.clone(), password)?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.set_message("Searching Jira...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = client.search(&jql).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let search = result.context("Jira search failed")?;
    let sprint = convert_search(&search, &config.story_points_field);
    sprint.validate()?;
    Ok(sprint)
}
