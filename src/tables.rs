// 🗂️ Ranking Tables - Per-year TSV files written by the collector, read by the deduplicator

use crate::record::{BookRecord, RankingRow};
use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const YEAR_TABLE_HEADER: [&str; 4] = ["Mês", "Colocação", "Nome do Livro", "Autor"];
pub const TOP_TABLE_HEADER: [&str; 2] = ["Frequência", "Nome do Livro"];

const MONTH_WIDTH: usize = 5;
const RANK_WIDTH: usize = 10;

// ============================================================================
// FILE NAMES
// ============================================================================

pub fn year_table_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("livros_geral_{}.txt", year))
}

/// Named after the table size: `top_10_livros_2024.txt` for the default of 10
pub fn top_table_path(dir: &Path, year: i32, n: usize) -> PathBuf {
    dir.join(format!("top_{}_livros_{}.txt", n, year))
}

/// Tables are split on raw tabs, so a field must not carry a tab or line break
fn table_field(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

fn table_writer(path: &Path) -> Result<csv::Writer<File>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .with_context(|| format!("Failed to create table: {}", path.display()))
}

// ============================================================================
// FULL-YEAR TABLE
// ============================================================================

/// Write every row collected for `year`, month and rank left-aligned and space-padded
pub fn write_year_table(dir: &Path, year: i32, rows: &[RankingRow]) -> Result<PathBuf> {
    let path = year_table_path(dir, year);
    let mut writer = table_writer(&path)?;

    writer.write_record(YEAR_TABLE_HEADER)?;
    for row in rows {
        let month = format!("{:<width$}", table_field(&row.month), width = MONTH_WIDTH);
        let rank = format!("{:<width$}", table_field(&row.rank), width = RANK_WIDTH);
        let title = table_field(&row.title);
        let author = table_field(&row.author);
        writer
            .write_record([month.as_str(), rank.as_str(), title.as_str(), author.as_str()])
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush table: {}", path.display()))?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Read a full-year table. The header and any line without exactly 4 fields are skipped.
/// Lines are split on tabs only; quotes are ordinary characters.
pub fn read_year_table(path: &Path) -> Result<Vec<RankingRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open table: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut rows = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse line {} in {}", line_num + 2, path.display())
        })?;

        if record.len() != YEAR_TABLE_HEADER.len() {
            debug!(
                "Skipping line {} in {}: {} fields",
                line_num + 2,
                path.display(),
                record.len()
            );
            continue;
        }

        rows.push(RankingRow::new(
            record[0].trim(),
            record[1].trim(),
            &record[2],
            &record[3],
        ));
    }

    Ok(rows)
}

/// Records loaded across several years, in year order then file order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedRecords {
    pub records: Vec<BookRecord>,
    pub years_found: Vec<i32>,
    pub years_missing: Vec<i32>,
}

/// Load (title, author) from each year's table; years without a file are skipped
pub fn load_records(dir: &Path, years: &[i32]) -> Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();

    for &year in years {
        let path = year_table_path(dir, year);
        if !path.exists() {
            warn!("No table for {} at {}", year, path.display());
            loaded.years_missing.push(year);
            continue;
        }

        let rows = read_year_table(&path)?;
        info!("Loaded {} rows for {}", rows.len(), year);

        loaded.records.extend(rows.into_iter().map(BookRecord::from));
        loaded.years_found.push(year);
    }

    Ok(loaded)
}

// ============================================================================
// TOP-N FREQUENCY TABLE
// ============================================================================

/// The `n` most frequent exact titles. Ties keep first-occurrence order.
pub fn top_titles(rows: &[RankingRow], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for row in rows {
        let count = counts.entry(row.title.as_str()).or_insert(0);
        if *count == 0 {
            order.push(row.title.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|title| (title.to_string(), counts[title]))
        .collect();

    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Write the frequency table for `year`: count first, then title
pub fn write_top_table(dir: &Path, year: i32, rows: &[RankingRow], n: usize) -> Result<PathBuf> {
    let path = top_table_path(dir, year, n);
    let mut writer = table_writer(&path)?;

    writer.write_record(TOP_TABLE_HEADER)?;
    for (title, count) in top_titles(rows, n) {
        writer.write_record([count.to_string(), table_field(&title)])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush table: {}", path.display()))?;

    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_rows() -> Vec<RankingRow> {
        vec![
            RankingRow::new("1", "1", "É Assim que Acaba", "Colleen Hoover"),
            RankingRow::new("1", "2", "Torto Arado", "Itamar Vieira Junior"),
            RankingRow::new("2", "1", "Torto Arado", "Itamar Vieira Junior"),
            RankingRow::new("2", "2", "Verity", "Colleen Hoover"),
            RankingRow::new("3", "1", "Verity", "Colleen Hoover"),
            RankingRow::new("3", "2", "Tudo é Rio", "Carla Madeira"),
        ]
    }

    #[test]
    fn test_year_table_round_trip() {
        let dir = tempdir().unwrap();
        let path = write_year_table(dir.path(), 2024, &sample_rows()).unwrap();

        assert_eq!(path, dir.path().join("livros_geral_2024.txt"));
        assert_eq!(read_year_table(&path).unwrap(), sample_rows());
    }

    #[test]
    fn test_year_table_layout() {
        let dir = tempdir().unwrap();
        let rows = vec![RankingRow::new("12", "3", "Verity", "Colleen Hoover")];
        let path = write_year_table(dir.path(), 2023, &rows).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "Mês\tColocação\tNome do Livro\tAutor");
        assert_eq!(lines[1], "12   \t3         \tVerity\tColleen Hoover");
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("livros_geral_2022.txt");
        fs::write(
            &path,
            "Mês\tColocação\tNome do Livro\tAutor\n\
             1    \t1         \tVerity\tColleen Hoover\n\
             broken line without tabs\n\
             1\t2\tToo\tMany\tFields\n\
             2    \t1         \tTorto Arado\tItamar Vieira Junior\n",
        )
        .unwrap();

        let rows = read_year_table(&path).unwrap();

        assert_eq!(
            rows,
            vec![
                RankingRow::new("1", "1", "Verity", "Colleen Hoover"),
                RankingRow::new("2", "1", "Torto Arado", "Itamar Vieira Junior"),
            ]
        );
    }

    #[test]
    fn test_unbalanced_quote_does_not_swallow_following_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("livros_geral_2021.txt");
        fs::write(
            &path,
            "Mês\tColocação\tNome do Livro\tAutor\n\
             1\t1\t\"Eu e os outros\tFulano\n\
             1\t2\tVerity\tColleen Hoover\n\
             2\t1\tTorto Arado\tItamar Vieira Junior\n",
        )
        .unwrap();

        let rows = read_year_table(&path).unwrap();

        assert_eq!(
            rows,
            vec![
                RankingRow::new("1", "1", "\"Eu e os outros", "Fulano"),
                RankingRow::new("1", "2", "Verity", "Colleen Hoover"),
                RankingRow::new("2", "1", "Torto Arado", "Itamar Vieira Junior"),
            ]
        );
    }

    #[test]
    fn test_quotes_survive_round_trip() {
        let dir = tempdir().unwrap();
        let rows = vec![
            RankingRow::new("4", "1", "\"Eu\" e os outros", "Fulano"),
            RankingRow::new("4", "2", "O \"Livro\"", "Beltrano"),
        ];
        let path = write_year_table(dir.path(), 2020, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\t\"Eu\" e os outros\tFulano\n"));
        assert_eq!(read_year_table(&path).unwrap(), rows);
    }

    #[test]
    fn test_tabs_inside_fields_are_flattened() {
        let dir = tempdir().unwrap();
        let rows = vec![RankingRow::new("5", "1", "Torto\tArado", "Itamar\nVieira Junior")];
        let path = write_year_table(dir.path(), 2019, &rows).unwrap();

        assert_eq!(
            read_year_table(&path).unwrap(),
            vec![RankingRow::new("5", "1", "Torto Arado", "Itamar Vieira Junior")]
        );
    }

    #[test]
    fn test_top_table_named_after_size() {
        let dir = tempdir().unwrap();
        assert_eq!(
            top_table_path(dir.path(), 2024, 10),
            dir.path().join("top_10_livros_2024.txt")
        );

        let path = write_top_table(dir.path(), 2024, &sample_rows(), 5).unwrap();
        assert_eq!(path, dir.path().join("top_5_livros_2024.txt"));
    }

    #[test]
    fn test_load_records_in_year_order() {
        let dir = tempdir().unwrap();
        write_year_table(
            dir.path(),
            2024,
            &[RankingRow::new("1", "1", "Verity", "Colleen Hoover")],
        )
        .unwrap();
        write_year_table(
            dir.path(),
            2023,
            &[RankingRow::new("1", "1", "Torto Arado", "Itamar Vieira Junior")],
        )
        .unwrap();

        let loaded = load_records(dir.path(), &[2024, 2023, 2022]).unwrap();

        assert_eq!(
            loaded.records,
            vec![
                BookRecord::new("Verity", "Colleen Hoover"),
                BookRecord::new("Torto Arado", "Itamar Vieira Junior"),
            ]
        );
        assert_eq!(loaded.years_found, vec![2024, 2023]);
        assert_eq!(loaded.years_missing, vec![2022]);
    }

    #[test]
    fn test_top_titles_frequency_and_ties() {
        let top = top_titles(&sample_rows(), 10);

        assert_eq!(
            top,
            vec![
                ("Torto Arado".to_string(), 2),
                ("Verity".to_string(), 2),
                ("É Assim que Acaba".to_string(), 1),
                ("Tudo é Rio".to_string(), 1),
            ]
        );
        assert_eq!(top_titles(&sample_rows(), 1).len(), 1);
        assert!(top_titles(&[], 10).is_empty());
    }

    #[test]
    fn test_write_top_table() {
        let dir = tempdir().unwrap();
        let path = write_top_table(dir.path(), 2021, &sample_rows(), 2).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(path, dir.path().join("top_2_livros_2021.txt"));
        assert_eq!(content, "Frequência\tNome do Livro\n2\tTorto Arado\n2\tVerity\n");
    }
}
