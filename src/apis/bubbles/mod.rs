/// Crypto Bubbles backend client
///
/// Endpoints used:
/// 1. /backend/data/bubbles1000.{quote}.json - coin list with metrics (catalog + metrics)
/// 2. /backend/data/charts/{range}/{id}/{QUOTE}.json - price series
///
/// All calls are read-only and uncached; the bubble index is the only cache.
pub mod metrics;
pub mod types;

use self::metrics::{decode_metrics_list, find_metrics};
use self::types::{BubbleCoin, BubbleMetrics, ChartPoint, ChartRange};
use crate::apis::client::{decode_json, HttpClient};
use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::index::CatalogSource;
use crate::logger::{self, LogTag};
use async_trait::async_trait;

pub const DEFAULT_BASE_URL: &str = "https://cryptobubbles.net";

pub struct BubblesClient {
    http_client: HttpClient,
    base_url: String,
}

impl BubblesClient {
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs, user_agent)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&cfg.base_url, cfg.timeout_secs, &cfg.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bubbles_url(&self, quote: &str) -> String {
        format!(
            "{}/backend/data/bubbles1000.{}.json",
            self.base_url,
            quote.trim().to_lowercase()
        )
    }

    pub fn chart_url(&self, coin_id: i64, quote: &str, range: ChartRange) -> String {
        format!(
            "{}/backend/data/charts/{}/{}/{}.json",
            self.base_url,
            range.path(),
            coin_id,
            quote.trim().to_uppercase()
        )
    }

    /// Fetch the full coin list for a quote currency
    pub async fn fetch_all(&self, quote: &str) -> Result<Vec<BubbleCoin>, ApiError> {
        let url = self.bubbles_url(quote);
        let coins: Vec<BubbleCoin> = self.http_client.get_json(&url).await?;

        logger::debug(
            LogTag::Api,
            &format!("Fetched {} coins for {}", coins.len(), quote),
        );

        Ok(coins)
    }

    /// Fetch a price series for one coin
    pub async fn fetch_series(
        &self,
        coin_id: i64,
        quote: &str,
        range: ChartRange,
    ) -> Result<Vec<ChartPoint>, ApiError> {
        let url = self.chart_url(coin_id, quote, range);
        let body = self.http_client.get_bytes(&url).await?;
        let points: Vec<ChartPoint> = decode_json(&body)?;

        logger::debug(
            LogTag::Charts,
            &format!(
                "Fetched {} {} points for coin {}",
                points.len(),
                range.path(),
                coin_id
            ),
        );

        Ok(points)
    }

    /// Fetch aggregate metrics for one coin
    ///
    /// Looks up by numeric id first, then by case-insensitive symbol.
    /// Returns `Ok(None)` when neither matches.
    pub async fn fetch_metrics(
        &self,
        quote: &str,
        coin_id: Option<i64>,
        symbol: Option<&str>,
    ) -> Result<Option<BubbleMetrics>, ApiError> {
        let url = self.bubbles_url(quote);
        let body = self.http_client.get_bytes(&url).await?;
        let list = decode_metrics_list(&body)?;

        let hit = find_metrics(list, coin_id, symbol);
        if hit.is_none() {
            logger::debug(
                LogTag::Charts,
                &format!("No metrics for id={:?} symbol={:?}", coin_id, symbol),
            );
        }

        Ok(hit)
    }
}

#[async_trait]
impl CatalogSource for BubblesClient {
    async fn fetch_catalog(&self, quote: &str) -> Result<Vec<BubbleCoin>, ApiError> {
        self.fetch_all(quote).await
    }
}
