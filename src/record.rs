// 📚 Records - What flows between the collector, the tables and the deduplicator

use serde::{Deserialize, Serialize};

/// A book as seen by the deduplicator: title + author, nothing else.
/// Duplicates are expected here; filtering happens downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        BookRecord {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Output line format: "{title} - {author}"
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.title, self.author)
    }
}

/// One line of a per-year ranking table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    #[serde(rename = "Mês")]
    pub month: String,

    #[serde(rename = "Colocação")]
    pub rank: String,

    #[serde(rename = "Nome do Livro")]
    pub title: String,

    #[serde(rename = "Autor")]
    pub author: String,
}

impl RankingRow {
    pub fn new(
        month: impl Into<String>,
        rank: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        RankingRow {
            month: month.into(),
            rank: rank.into(),
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Only title and author are forwarded into deduplication
impl From<RankingRow> for BookRecord {
    fn from(row: RankingRow) -> Self {
        BookRecord {
            title: row.title,
            author: row.author,
        }
    }
}
