// 🌐 Collector - Monthly ranking pages → RankingRow
//
// RankingSource is the seam: the pipeline only knows about fetch_month(),
// PublishNewsClient is the HTTP implementation (cargo feature "collector").

use crate::record::RankingRow;
use anyhow::Result;
use log::{info, warn};

pub const MONTHS: std::ops::RangeInclusive<u32> = 1..=12;

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// Anything that can produce the ranking of one month
pub trait RankingSource {
    fn fetch_month(&self, year: i32, month: u32) -> Result<Vec<RankingRow>>;

    /// Short name for logs
    fn name(&self) -> &str {
        "ranking source"
    }
}

/// Collect January through December of `year`.
///
/// A month that fails is logged and contributes nothing; the rest of the year continues.
pub fn collect_year(source: &dyn RankingSource, year: i32) -> Vec<RankingRow> {
    let mut rows = Vec::new();

    for month in MONTHS {
        match source.fetch_month(year, month) {
            Ok(month_rows) => {
                info!("{} {}/{}: {} entries", source.name(), month, year, month_rows.len());
                rows.extend(month_rows);
            }
            Err(e) => {
                warn!("{} {}/{} failed: {:#}", source.name(), month, year, e);
            }
        }
    }

    rows
}

// ============================================================================
// HTTP + HTML (PublishNews)
// ============================================================================

#[cfg(feature = "collector")]
pub use http::{parse_ranking_page, PublishNewsClient};

#[cfg(feature = "collector")]
mod http {
    use super::RankingSource;
    use crate::record::RankingRow;
    use anyhow::{anyhow, Context, Result};
    use log::{debug, warn};
    use reqwest::blocking::Client;
    use scraper::{ElementRef, Html, Selector};
    use std::time::Duration;

    const RANK_CLASS: &str = "div.pn-ranking-livros-posicao-numero";
    const BOOK_CLASS: &str = "div.pn-ranking-livro-dados";
    const TITLE_CLASS: &str = "div.pn-ranking-livro-nome";
    const AUTHOR_CLASS: &str = "div.pn-ranking-livro-autor";
    const MISSING_RANK: &str = "N/A";

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| anyhow!("Invalid selector {}: {:?}", css, e))
    }

    /// Text of an element: each text node trimmed, then concatenated
    fn stripped_text(element: ElementRef) -> String {
        element.text().map(str::trim).collect()
    }

    /// Extract every book block of a ranking page.
    ///
    /// A block's rank is the nearest rank marker before it in document order.
    /// Blocks without a title or author element are skipped.
    pub fn parse_ranking_page(html: &str, month: u32) -> Result<Vec<RankingRow>> {
        let document = Html::parse_document(html);

        let markers = selector(&format!("{}, {}", RANK_CLASS, BOOK_CLASS))?;
        let rank_marker = selector(RANK_CLASS)?;
        let title = selector(TITLE_CLASS)?;
        let author = selector(AUTHOR_CLASS)?;

        let mut rows = Vec::new();
        let mut current_rank: Option<String> = None;

        for element in document.select(&markers) {
            if rank_marker.matches(&element) {
                current_rank = Some(stripped_text(element));
                continue;
            }

            let title_text = element.select(&title).next().map(stripped_text);
            let author_text = element.select(&author).next().map(stripped_text);

            match (title_text, author_text) {
                (Some(title_text), Some(author_text)) => {
                    let rank = current_rank.as_deref().unwrap_or(MISSING_RANK);
                    rows.push(RankingRow::new(month.to_string(), rank, title_text, author_text));
                }
                _ => warn!("Book block without title or author in month {}, skipped", month),
            }
        }

        debug!("Parsed {} books for month {}", rows.len(), month);
        Ok(rows)
    }

    /// Blocking client for the PublishNews monthly ranking
    pub struct PublishNewsClient {
        client: Client,
        base_url: String,
    }

    impl PublishNewsClient {
        pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .timeout(timeout)
                .user_agent(concat!("bestseller-rankings/", env!("CARGO_PKG_VERSION")))
                .build()
                .context("Failed to build HTTP client")?;

            Ok(PublishNewsClient {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            })
        }

        pub fn month_url(&self, year: i32, month: u32) -> String {
            format!("{}/0/{}/{}/0", self.base_url, year, month)
        }
    }

    impl RankingSource for PublishNewsClient {
        fn fetch_month(&self, year: i32, month: u32) -> Result<Vec<RankingRow>> {
            let url = self.month_url(year, month);
            debug!("GET {}", url);

            let html = self
                .client
                .get(&url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .with_context(|| format!("Request failed: {}", url))?;

            parse_ranking_page(&html, month)
        }

        fn name(&self) -> &str {
            "PublishNews"
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    /// Two books per month, except March which fails
    struct FakeSource;

    impl RankingSource for FakeSource {
        fn fetch_month(&self, year: i32, month: u32) -> Result<Vec<RankingRow>> {
            if month == 3 {
                return Err(anyhow!("503 Service Unavailable"));
            }
            Ok(vec![
                RankingRow::new(month.to_string(), "1", format!("Livro {}", year), "Autora"),
                RankingRow::new(month.to_string(), "2", "Verity", "Colleen Hoover"),
            ])
        }
    }

    #[test]
    fn test_collect_year_skips_failed_month() {
        let rows = collect_year(&FakeSource, 2024);

        assert_eq!(rows.len(), 22);
        assert!(rows.iter().all(|r| r.month != "3"));
        assert_eq!(rows[0].month, "1");
        assert_eq!(rows.last().unwrap().month, "12");
    }

    #[cfg(feature = "collector")]
    mod html {
        use super::super::*;
        use std::time::Duration;

        const PAGE: &str = r#"
            <html><body>
              <div class="pn-ranking-livros-posicao">
                <div class="pn-ranking-livros-posicao-numero"> 1 </div>
              </div>
              <div class="pn-ranking-livro">
                <div class="pn-ranking-livro-dados">
                  <div class="pn-ranking-livro-nome">
                    É Assim que Acaba
                  </div>
                  <div class="pn-ranking-livro-autor"> Colleen Hoover </div>
                </div>
              </div>
              <div class="pn-ranking-livros-posicao-numero">2</div>
              <div class="pn-ranking-livro-dados">
                <div class="pn-ranking-livro-nome">Torto <b>Arado</b></div>
                <div class="pn-ranking-livro-autor">Itamar Vieira Junior</div>
              </div>
              <div class="pn-ranking-livro-dados">
                <div class="pn-ranking-livro-nome">Sem autor</div>
              </div>
            </body></html>
        "#;

        #[test]
        fn test_parse_ranking_page() {
            let rows = parse_ranking_page(PAGE, 7).unwrap();

            assert_eq!(
                rows,
                vec![
                    RankingRow::new("7", "1", "É Assim que Acaba", "Colleen Hoover"),
                    RankingRow::new("7", "2", "TortoArado", "Itamar Vieira Junior"),
                ]
            );
        }

        #[test]
        fn test_rank_missing_before_first_marker() {
            let page = r#"<div class="pn-ranking-livro-dados">
                <div class="pn-ranking-livro-nome">Verity</div>
                <div class="pn-ranking-livro-autor">Colleen Hoover</div>
            </div>"#;

            let rows = parse_ranking_page(page, 1).unwrap();

            assert_eq!(rows, vec![RankingRow::new("1", "N/A", "Verity", "Colleen Hoover")]);
        }

        #[test]
        fn test_empty_page() {
            assert!(parse_ranking_page("<html></html>", 1).unwrap().is_empty());
        }

        #[test]
        fn test_month_url() {
            let client = PublishNewsClient::new(
                "https://www.publishnews.com.br/ranking/mensal/",
                Duration::from_secs(5),
            )
            .unwrap();

            assert_eq!(
                client.month_url(2024, 3),
                "https://www.publishnews.com.br/ranking/mensal/0/2024/3/0"
            );
        }
    }
}
