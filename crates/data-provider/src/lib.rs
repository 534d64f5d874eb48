use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::Utc;
use configuration::ProviderConfig;
use core_types::MarketSnapshot;
use scraper::Html;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub mod error;
pub mod html;

/// The abstract source of market data for a ticker.
/// This trait is the contract the CLI uses, allowing the underlying
/// implementation (live HTTP or an offline file) to be swapped out.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches everything the valuation needs for one ticker.
    async fn fetch_snapshot(&self, ticker: &str) -> Result<MarketSnapshot, ProviderError>;
}

/// A concrete `DataProvider` that scrapes stockanalysis.com style pages.
#[derive(Clone)]
pub struct StockAnalysisClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

/// The three pages that make up a snapshot, as fetched.
struct Pages {
    forecast: String,
    dividend: String,
    overview: String,
}

impl StockAnalysisClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    fn page_url(&self, ticker: &str, section: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let ticker = ticker.to_lowercase();
        if section.is_empty() {
            format!("{base}/stocks/{ticker}/")
        } else {
            format!("{base}/stocks/{ticker}/{section}/")
        }
    }

    async fn get_text(&self, url: String) -> Result<String, ProviderError> {
        tracing::debug!(%url, "Fetching page");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Turns fetched pages into a snapshot. Kept synchronous because parsed
    /// documents must not live across an await point.
    fn assemble(&self, ticker: &str, pages: Pages) -> Result<MarketSnapshot, ProviderError> {
        let forecast = Html::parse_document(&pages.forecast);
        let current_price = html::extract_price(&forecast, &self.config.price_selector)?;
        let table = html::extract_forecast_table(&forecast, &self.config.table_selector)?;

        let dividend = Html::parse_document(&pages.dividend);
        let annual_dividend = html::extract_dividend(&dividend, &self.config.dividend_selector)?;
        if annual_dividend.is_none() {
            tracing::warn!(%ticker, "No annual dividend found; the company likely pays none");
        }

        let overview = Html::parse_document(&pages.overview);
        let key_values = html::extract_key_values(&overview)?;

        Ok(MarketSnapshot {
            ticker: ticker.to_uppercase(),
            table,
            key_values,
            current_price,
            annual_dividend,
            retrieved_at: Utc::now(),
        })
    }
}

#[async_trait]
impl DataProvider for StockAnalysisClient {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<MarketSnapshot, ProviderError> {
        let (forecast, dividend, overview) = tokio::try_join!(
            self.get_text(self.page_url(ticker, "forecast")),
            self.get_text(self.page_url(ticker, "dividend")),
            self.get_text(self.page_url(ticker, "")),
        )?;

        self.assemble(
            ticker,
            Pages {
                forecast,
                dividend,
                overview,
            },
        )
    }
}

/// An in-memory `DataProvider`, keyed by upper-cased ticker.
///
/// Used for offline runs from a JSON file of previously captured snapshots.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    snapshots: HashMap<String, MarketSnapshot>,
}

impl StaticProvider {
    pub fn new(snapshots: impl IntoIterator<Item = MarketSnapshot>) -> Self {
        Self {
            snapshots: snapshots
                .into_iter()
                .map(|s| (s.ticker.to_uppercase(), s))
                .collect(),
        }
    }

    /// Loads a JSON array of snapshots.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path)?;
        let snapshots: Vec<MarketSnapshot> = serde_json::from_str(&text)?;
        Ok(Self::new(snapshots))
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<MarketSnapshot, ProviderError> {
        self.snapshots
            .get(&ticker.to_uppercase())
            .cloned()
            .ok_or_else(|| ProviderError::UnknownTicker(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::{RawRow, RawTable};
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn snapshot(ticker: &str) -> MarketSnapshot {
        MarketSnapshot {
            ticker: ticker.to_string(),
            table: RawTable::new(
                vec!["2024".to_string(), "2025".to_string()],
                vec![RawRow::new("EPS", vec!["5.00".to_string(), "6.00".to_string()])],
            ),
            key_values: vec![("Beta".to_string(), "1.1".to_string())],
            current_price: dec!(100),
            annual_dividend: Some(dec!(2)),
            retrieved_at: Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn urls_follow_site_layout() {
        let mut config = ProviderConfig::default();
        config.base_url = "https://example.test/".to_string();
        let client = StockAnalysisClient::new(config).unwrap();

        assert_eq!(
            client.page_url("AAPL", "forecast"),
            "https://example.test/stocks/aapl/forecast/"
        );
        assert_eq!(client.page_url("KO", ""), "https://example.test/stocks/ko/");
    }

    #[test]
    fn assembles_snapshot_from_pages() {
        let client = StockAnalysisClient::new(ProviderConfig::default()).unwrap();
        let pages = Pages {
            forecast: r#"
                <div class="text-4xl font-bold block">61.10</div>
                <table class="w-full whitespace-nowrap border text-right">
                  <tr><th>Year</th><th>2024</th><th>2025</th></tr>
                  <tr><td>EPS</td><td>2.84</td><td>3.01</td></tr>
                </table>"#
                .to_string(),
            dividend: r#"<div class="mt-0.5 text-lg font-semibold">$1.94</div>"#.to_string(),
            overview: "<table><tr><td>Beta</td><td>0.59</td></tr></table>".to_string(),
        };

        let snap = client.assemble("ko", pages).unwrap();
        assert_eq!(snap.ticker, "KO");
        assert_eq!(snap.current_price, dec!(61.10));
        assert_eq!(snap.annual_dividend, Some(dec!(1.94)));
        assert_eq!(snap.table.years, vec!["2024", "2025"]);
        assert_eq!(snap.key_values, vec![("Beta".to_string(), "0.59".to_string())]);
    }

    #[tokio::test]
    async fn static_provider_is_case_insensitive() {
        let provider = StaticProvider::new(vec![snapshot("msft")]);
        let snap = provider.fetch_snapshot("MsFt").await.unwrap();
        assert_eq!(snap.current_price, dec!(100));

        let err = provider.fetch_snapshot("IBM").await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownTicker(t) if t == "IBM"));
    }

    #[tokio::test]
    async fn static_provider_loads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&vec![snapshot("JNJ"), snapshot("PG")]).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let provider = StaticProvider::from_json_file(file.path()).unwrap();
        assert_eq!(provider.fetch_snapshot("jnj").await.unwrap(), snapshot("JNJ"));
        assert_eq!(provider.fetch_snapshot("pg").await.unwrap(), snapshot("PG"));
    }
}
