//! Error Types for Market Data

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketDataError>;

#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream API answered with a non-success status
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    /// The upstream API answered but carried no quote for the coin
    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
