//! SprintChart - stacked story-point charts for sprint boards
//!
//! A CLI tool that groups sprint issues by category, splits them by
//! platform and writes a Highcharts configuration or a Markdown table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid input, config, Jira failure, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod jira;
mod models;

use analysis::{CategoryGroups, Evaluation};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::Sprint;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("SprintChart v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Chart generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .sprintchart.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the Jira connection, chart mode and cutoff hour.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the sprint, aggregate it once and write the chart.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let sprint = load_sprint(&args, &config).await?;
    info!("Loaded {} issues", sprint.issues.len());

    // One evaluation instant for every series of this chart.
    let eval = match args.now {
        Some(now) => Evaluation::new(now, config.chart.cutoff_hour),
        None => Evaluation::capture(config.chart.cutoff_hour),
    };
    debug!("Evaluating at {}", eval.now().to_rfc3339());

    let groups = CategoryGroups::from_issues(&sprint.issues);
    info!("Grouped issues into {} categories", groups.len());

    let output = match config.general.format {
        OutputFormat::Highcharts => {
            let settings = config.chart.settings();
            let chart = chart::build_chart(&groups, config.chart.mode, &eval, &settings);
            serde_json::to_string_pretty(&chart).context("Failed to serialize chart")?
        }
        OutputFormat::Markdown => {
            chart::generate_markdown_report(&groups, config.chart.mode, &eval)
        }
    };

    write_output(&config.general.output, &output)?;
    Ok(())
}

/// Read the sprint from a file or fetch it from Jira.
async fn load_sprint(args: &Args, config: &Config) -> Result<Sprint> {
    if let Some(ref input) = args.input {
        info!("Reading sprint from: {}", input.display());
        return Sprint::load(input);
    }

    let sprint = jira::fetch_sprint(&config.jira, args.jira_password.clone(), !args.quiet).await?;

    if let Some(ref path) = args.save_issues {
        std::fs::write(path, sprint.to_json()?)
            .with_context(|| format!("Failed to write issues to {}", path.display()))?;
        info!("Saved {} issues to {}", sprint.issues.len(), path.display());
    }

    Ok(sprint)
}

fn write_output(target: &str, content: &str) -> Result<()> {
    if target == "-" {
        println!("{}", content);
        return Ok(());
    }

    std::fs::write(target, content)
        .with_context(|| format!("Failed to write chart to {}", target))?;
    info!("Chart saved to: {}", target);
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_from_dir(Path::new(".")) {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
