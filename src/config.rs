// ⚙️ Configuration - Years, directories and the similarity threshold
// Loaded from an optional JSON file; every key has a default

use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://www.publishnews.com.br/ranking/mensal";
pub const DEFAULT_DATA_DIR: &str = "2024_2020_mensais";
pub const UNIQUE_LIST_FILE: &str = "livros_unicos.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Years to collect and load, in processing order (most recent first by default)
    pub years: Vec<i32>,

    /// Where the per-year tables live
    pub input_directory: PathBuf,

    /// Unique list destination (None = `<input_directory>/livros_unicos.txt`)
    pub output_path: Option<PathBuf>,

    /// Scores strictly above this are near-duplicates (0 - 100)
    pub similarity_threshold: f64,

    /// Monthly ranking endpoint, without the `/0/{year}/{month}/0` suffix
    pub base_url: String,

    /// Rows in each yearly frequency table
    pub top_n: usize,

    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            years: (2020..=2024).rev().collect(),
            input_directory: PathBuf::from(DEFAULT_DATA_DIR),
            output_path: None,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            base_url: DEFAULT_BASE_URL.to_string(),
            top_n: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Resolved location of the unique list
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| self.input_directory.join(UNIQUE_LIST_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.similarity_threshold)
        {
            bail!(
                "similarityThreshold must be between 0 and 100, got {}",
                self.similarity_threshold
            );
        }

        if self.top_n == 0 {
            bail!("topN must be at least 1");
        }

        if self.base_url.trim().is_empty() {
            bail!("baseUrl must not be empty");
        }

        Ok(())
    }
}
