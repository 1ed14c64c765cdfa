use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use northscrape_lib::catalog::{CATEGORIES, LOCATIONS};
use northscrape_lib::config::DelaysConfig;
use northscrape_lib::{logger, GenerateRequest, LeadPipeline, Settings};

#[derive(Parser, Debug)]
#[command(name = "northscrape")]
#[command(about = "Discover and enrich business leads across northern Ontario")]
#[command(version)]
struct Cli {
    /// Category to search (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Location to search, e.g. "Sudbury, ON" (repeatable)
    #[arg(short, long = "location")]
    locations: Vec<String>,

    /// Search every catalog category
    #[arg(long)]
    all_categories: bool,

    /// Search every catalog location
    #[arg(long)]
    all_locations: bool,

    /// Skip phone/website enrichment
    #[arg(long)]
    no_enrich: bool,

    /// Override the enrichment worker count
    #[arg(short, long)]
    workers: Option<usize>,

    /// Disable politeness delays between requests
    #[arg(long)]
    no_delay: bool,

    /// CSV output path
    #[arg(short, long, default_value = "leads.csv")]
    output: PathBuf,

    /// Configuration file (defaults to ./config/northscrape.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the category and location catalog, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    if cli.list {
        println!("Categories:");
        CATEGORIES.iter().for_each(|c| println!("  {}", c));
        println!("Locations:");
        LOCATIONS.iter().for_each(|l| println!("  {}", l));
        return Ok(());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(workers) = cli.workers {
        settings.enrichment.workers = workers;
    }
    if cli.no_delay {
        settings.delays = DelaysConfig::disabled();
    }
    settings.validate()?;

    let categories = if cli.all_categories {
        CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        cli.categories
    };
    let locations = if cli.all_locations {
        LOCATIONS.iter().map(|l| l.to_string()).collect()
    } else {
        cli.locations
    };

    let request = GenerateRequest::new(categories, locations, !cli.no_enrich);
    info!(
        "Starting NorthScrape: {} categories x {} locations (enrich: {})",
        request.categories.len(),
        request.locations.len(),
        request.enrich
    );

    let pipeline = LeadPipeline::from_settings(&settings)?;
    let response = pipeline.run(&request)?;

    if response.count == 0 {
        warn!("No leads found.");
    }

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to open {}", cli.output.display()))?;
    for lead in &response.leads {
        writer.serialize(lead)?;
    }
    writer.flush()?;

    info!("Wrote {} leads to {}", response.count, cli.output.display());
    Ok(())
}
