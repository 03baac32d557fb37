//! Course-Crawler main entry point
//!
//! This is the command-line interface for the Course-Crawler lesson harvester.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use course_crawler::config::{load_config_with_hash, validate, Config};
use course_crawler::crawler::crawl;
use course_crawler::output::{
    format_summary, write_courses, ConsoleProgress, CrawlSummary, NoProgress, ProgressReporter,
};
use course_crawler::transform::transform_all;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Course-Crawler: crawl lesson data for one semester
///
/// Fetches every lesson of the semester from the lesson-search API,
/// normalizes each record, and writes them as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "course-crawler")]
#[command(version)]
#[command(about = "Crawl course data for one semester", long_about = None)]
struct Cli {
    /// Semester ID (e.g., 504)
    #[arg(short, long, value_name = "ID")]
    semester_id: u32,

    /// Output file path [default: courses.json]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Records requested per page
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Verify the server's TLS certificate and hostname
    #[arg(long)]
    strict_tls: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("course_crawler=info,warn"),
            1 => EnvFilter::new("course_crawler=debug,info"),
            2 => EnvFilter::new("course_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.path = output.to_string_lossy().into_owned();
    }
    if let Some(page_size) = cli.page_size {
        config.api.page_size = page_size;
    }
    if cli.strict_tls {
        config.api.accept_invalid_certs = false;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the crawl: fetch, transform, write
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let started_at = Utc::now();

    let progress: Box<dyn ProgressReporter> = if cli.no_progress || cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::default())
    };

    tracing::info!("Fetching courses for semester {}...", cli.semester_id);
    let outcome = crawl(&config.api, cli.semester_id, &*progress)
        .await
        .context("crawl failed")?;
    tracing::info!("Found {} courses", outcome.records.len());

    let courses = transform_all(&outcome.records);
    let output_path = PathBuf::from(&config.output.path);
    write_courses(&output_path, &courses, config.output.indent)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    tracing::info!("Saved to {}", output_path.display());

    let summary = CrawlSummary {
        semester_id: cli.semester_id,
        total_rows: outcome.total_rows,
        page_count: outcome.page_count,
        records: courses.len(),
        output_path: config.output.path.clone(),
        started_at,
        finished_at: Utc::now(),
    };
    for line in format_summary(&summary).lines() {
        tracing::info!("{}", line);
    }

    Ok(())
}
