//! Hiring-Radar main entry point
//!
//! This is the command-line interface for the Hiring-Radar job listing collector.

use clap::{ArgGroup, Parser};
use hiring_radar::catalog::{load_catalog, urls_for_industry};
use hiring_radar::config::{load_config_with_hash, validate, Config};
use hiring_radar::extract::Strategy;
use hiring_radar::output::{print_statistics, write_records};
use hiring_radar::pipeline::prepare_targets;
use hiring_radar::{CatalogError, Pipeline, RadarError};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hiring-Radar: collect startup job listings
///
/// Reads Greenhouse and Lever boards through their public APIs, falls back
/// to scanning career pages for job links where robots.txt allows, and
/// writes the validated listings as one JSON dataset.
#[derive(Parser, Debug)]
#[command(name = "hiring-radar")]
#[command(version)]
#[command(about = "Collect startup job listings into one dataset", long_about = None)]
#[command(group(ArgGroup::new("targets").required(true).args(["urls", "industry"])))]
struct Cli {
    /// One or more board or career page URLs
    #[arg(long, num_args = 1.., value_name = "URL")]
    urls: Vec<String>,

    /// Industry tag used to pick targets from the catalog (e.g. ai, fintech)
    #[arg(long, value_name = "TAG")]
    industry: Option<String>,

    /// CSV catalog with columns name,industry,url (used with --industry)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Output JSON path
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Safety cap on listings taken from one site
    #[arg(long, value_name = "N")]
    max_per_site: Option<usize>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show how each target would be handled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let Some(targets) = resolve_targets(&cli, &config)? else {
        return Ok(());
    };

    if cli.dry_run {
        handle_dry_run(&targets);
        return Ok(());
    }

    handle_run(&config, &targets, cli.quiet).await?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hiring_radar=info,warn"),
            1 => EnvFilter::new("hiring_radar=debug,info"),
            2 => EnvFilter::new("hiring_radar=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> hiring_radar::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(path) = &cli.catalog {
        config.catalog.path = path.display().to_string();
    }
    if let Some(path) = &cli.out {
        config.output.path = path.display().to_string();
    }
    if let Some(cap) = cli.max_per_site {
        config.output.max_per_site = cap;
    }

    validate(&config)?;
    Ok(config)
}

/// Builds the target list; None means the run should end quietly
fn resolve_targets(
    cli: &Cli,
    config: &Config,
) -> hiring_radar::Result<Option<Vec<String>>> {
    let Some(industry) = &cli.industry else {
        return Ok(Some(cli.urls.clone()));
    };

    let catalog_path = Path::new(&config.catalog.path);
    let entries = match load_catalog(catalog_path) {
        Ok(entries) => entries,
        Err(CatalogError::NotFound(path)) => {
            tracing::error!("[CATALOG] Not found: {}", path);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let urls = urls_for_industry(&entries, industry);
    if urls.is_empty() {
        tracing::warn!(
            "No targets found for industry '{}'. Check that {} lists URLs for it.",
            industry,
            config.catalog.path
        );
        return Ok(None);
    }

    tracing::info!("Found {} targets for industry '{}'", urls.len(), industry);
    Ok(Some(urls))
}

/// Handles the --dry-run mode: shows the dispatch decision per target
fn handle_dry_run(targets: &[String]) {
    println!("=== Hiring-Radar Dry Run ===\n");

    let prepared = prepare_targets(targets);
    for url in &prepared.urls {
        match Strategy::select(url) {
            Some(strategy) => println!("  {} -> {}", url, strategy),
            None => println!("  {} -> skipped (no company slug)", url),
        }
    }
    for skipped in &prepared.skipped {
        println!("  {} -> skipped (not an http(s) URL)", skipped);
    }

    println!(
        "\n✓ Would process {} targets ({} skipped)",
        prepared.urls.len(),
        prepared.skipped.len()
    );
}

/// Handles the main run: extract, write, report
async fn handle_run(
    config: &Config,
    targets: &[String],
    quiet: bool,
) -> hiring_radar::Result<()> {
    let pipeline = Pipeline::new(config).map_err(RadarError::Fetch)?;

    tracing::info!("Processing {} targets", targets.len());
    let report = pipeline.run(targets).await;

    let out = Path::new(&config.output.path);
    if let Err(e) = write_records(out, &report.records) {
        tracing::error!("Failed to write {}: {}", out.display(), e);
        return Err(e);
    }

    if !quiet {
        println!();
        print_statistics(&report.stats);
    }

    Ok(())
}
