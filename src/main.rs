use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use bestseller_rankings::{run_dedupe, Config, DedupeSummary};

#[derive(Parser)]
#[command(
    name = "bestseller-rankings",
    version,
    about = "Monthly best-seller rankings: collect and deduplicate"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON config file (keys: years, inputDirectory, outputPath, similarityThreshold, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the per-year tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Years to process, in order (e.g. 2024,2023,2022)
    #[arg(long, global = true, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// Similarity threshold (0-100); scores above it are duplicates
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Where to write the unique list
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Print the dedupe summary as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the monthly rankings and write per-year tables
    Collect,
    /// Deduplicate titles across the per-year tables
    Dedupe,
    /// Collect, then dedupe (default)
    Run,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Collect => run_collect_mode(&config)?,
        Command::Dedupe => run_dedupe_mode(&config, cli.json)?,
        Command::Run => {
            run_collect_mode(&config)?;
            run_dedupe_mode(&config, cli.json)?;
        }
    }

    Ok(())
}

fn init_logging() {
    let filters = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

/// Config file first, then CLI overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.input_directory = dir.clone();
    }
    if let Some(years) = &cli.years {
        config.years = years.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(output) = &cli.output {
        config.output_path = Some(output.clone());
    }

    config.validate()?;
    Ok(config)
}

#[cfg(feature = "collector")]
fn run_collect_mode(config: &Config) -> Result<()> {
    use bestseller_rankings::{run_collect, PublishNewsClient};
    use std::time::Duration;

    println!("🌐 Collecting monthly rankings");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let client = PublishNewsClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let summary = run_collect(config, &client)?;

    if summary.created_directory {
        println!("📁 Created directory {}", config.input_directory.display());
    }
    for year in &summary.years {
        println!("✓ {}: {} entries → {}", year.year, year.rows, year.table.display());
    }
    println!("\n✅ Tables saved in {}", config.input_directory.display());

    Ok(())
}

#[cfg(not(feature = "collector"))]
fn run_collect_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ Collector not available!");
    eprintln!("   Rebuild with: cargo build --features collector");
    std::process::exit(1);
}

fn run_dedupe_mode(config: &Config, json: bool) -> Result<()> {
    let summary = run_dedupe(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_dedupe_summary(&summary);
    }

    Ok(())
}

fn print_dedupe_summary(summary: &DedupeSummary) {
    println!("\n🔍 Deduplicating titles");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !summary.years_missing.is_empty() {
        println!("⚠️  No table for: {:?}", summary.years_missing);
    }
    println!("✓ Loaded {} entries from {:?}", summary.records_loaded, summary.years_found);
    println!("✓ Unique titles: {}", summary.unique);
    println!("✓ Near-duplicates dropped: {}", summary.discarded);
    println!("\n✅ Unique list saved to {}", summary.output_path.display());
}
