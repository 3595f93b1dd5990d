// 🚚 Pipeline - Collect stage and dedupe stage, wired to Config
// The two stages only share the data directory

use crate::collector::{collect_year, RankingSource};
use crate::config::Config;
use crate::deduplication::DeduplicationEngine;
use crate::output::write_unique_list;
use crate::tables::{load_records, write_top_table, write_year_table};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// SUMMARIES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct YearCollection {
    pub year: i32,
    pub rows: usize,
    pub table: PathBuf,
    pub top_table: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectSummary {
    pub created_directory: bool,
    pub years: Vec<YearCollection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupeSummary {
    pub years_found: Vec<i32>,
    pub years_missing: Vec<i32>,
    pub records_loaded: usize,
    pub unique: usize,
    pub discarded: usize,
    pub output_path: PathBuf,
}

// ============================================================================
// STAGES
// ============================================================================

/// Scrape every configured year and write its full table and top table
pub fn run_collect(config: &Config, source: &dyn RankingSource) -> Result<CollectSummary> {
    config.validate()?;

    let dir = &config.input_directory;
    let mut summary = CollectSummary::default();

    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        info!("Created data directory {}", dir.display());
        summary.created_directory = true;
    }

    for &year in &config.years {
        let rows = collect_year(source, year);

        let table = write_year_table(dir, year, &rows)?;
        let top_table = write_top_table(dir, year, &rows, config.top_n)?;
        info!("{}: {} rows → {}", year, rows.len(), table.display());

        summary.years.push(YearCollection {
            year,
            rows: rows.len(),
            table,
            top_table,
        });
    }

    Ok(summary)
}

/// Load every configured year's table, deduplicate, write the unique list
pub fn run_dedupe(config: &Config) -> Result<DedupeSummary> {
    config.validate()?;

    let loaded = load_records(&config.input_directory, &config.years)?;
    let engine = DeduplicationEngine::with_threshold(config.similarity_threshold);
    let outcome = engine.deduplicate(&loaded.records);

    let output_path = config.output_path();
    write_unique_list(&output_path, &outcome.unique)?;

    info!(
        "{} records → {} unique ({} near-duplicates dropped)",
        loaded.records.len(),
        outcome.unique.len(),
        outcome.discarded.len()
    );

    Ok(DedupeSummary {
        years_found: loaded.years_found,
        years_missing: loaded.years_missing,
        records_loaded: loaded.records.len(),
        unique: outcome.unique.len(),
        discarded: outcome.discarded.len(),
        output_path,
    })
}

// ============================================================================
// TESTS
// ============================================================================
