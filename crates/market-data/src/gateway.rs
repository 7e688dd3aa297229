//! Market Data Gateway
//!
//! Abstraction over the read-only price API plus the CoinGecko-backed
//! implementation. Coin identifiers are lowercase slugs ("bitcoin").

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MarketDataError, Result};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Spot price with 24h movement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricePoint {
    /// Current price in USD
    pub usd: f64,

    /// 24-hour change percentage; absent when the upstream has no data
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
}

/// A USD-denominated quote
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsdQuote {
    pub usd: f64,
}

/// Market snapshot for a coin, trimmed to the fields the agent reports on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoinDetails {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_data: MarketSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub current_price: UsdQuote,
    pub market_cap: UsdQuote,
    pub total_volume: UsdQuote,
    pub high_24h: UsdQuote,
    pub low_24h: UsdQuote,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    pub ath: UsdQuote,
    pub atl: UsdQuote,
}

/// Market data gateway trait (Strategy pattern)
///
/// Implement this for each upstream: CoinGecko, CoinMarketCap, etc.
/// Stateless and reentrant; one instance serves concurrent requests.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Get the current USD price and 24h change for a coin slug
    async fn fetch_current_price(&self, coin: &str) -> Result<PricePoint>;

    /// Get the detailed market snapshot for a coin slug
    async fn fetch_coin_details(&self, coin: &str) -> Result<CoinDetails>;
}

/// CoinGecko client
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Point the client at a different API root (tests, proxies)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create from environment variables (COINGECKO_API_URL override)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| COINGECKO_API_URL.into());
        Self::with_base_url(base_url)
    }
}

#[async_trait]
impl MarketData for CoinGeckoClient {
    async fn fetch_current_price(&self, coin: &str) -> Result<PricePoint> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url, coin
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Upstream(format!(
                "price endpoint returned {}",
                response.status()
            )));
        }

        // Keyed by slug: {"bitcoin": {"usd": ..., "usd_24h_change": ...}}
        let mut quotes: HashMap<String, PricePoint> = response.json().await?;
        quotes
            .remove(coin)
            .ok_or_else(|| MarketDataError::PriceUnavailable(coin.into()))
    }

    async fn fetch_coin_details(&self, coin: &str) -> Result<CoinDetails> {
        let url = format!("{}/coins/{}", self.base_url, coin);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Upstream(format!(
                "coins endpoint returned {}",
                response.status()
            )));
        }

        let details: CoinDetails = response.json().await?;
        Ok(details)
    }
}
