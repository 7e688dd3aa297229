//! # market-data
//!
//! Market data gateway for the crypto agent: CoinGecko-backed price and
//! detail lookups, a fixed-threshold risk heuristic, and the `Tool`
//! implementations that expose them to the generation loop.

pub mod error;
pub mod gateway;
pub mod risk;
pub mod tools;

pub use error::{MarketDataError, Result};
pub use gateway::{CoinDetails, CoinGeckoClient, MarketData, MarketSnapshot, PricePoint, UsdQuote};
pub use risk::{RiskAssessment, RiskLevel, assess_risk, classify_change};
pub use tools::{CoinDetailsTool, PriceTool, RiskTool};

/// System prompt for the crypto agent
pub const LYNX_SYSTEM_PROMPT: &str = r#"You are Lynx, an expert cryptocurrency analysis agent. Your job is to help users make informed decisions about crypto investments.

When users ask about a cryptocurrency:
1. Always fetch the current price and 24h change using the fetch-current-price tool
2. Fetch detailed coin information using the fetch-coin-details tool when needed
3. Assess the risk level using the fetch-assessment-risk tool
4. Provide clear, actionable recommendations
5. Explain your reasoning in simple terms

Be helpful, professional, and data-driven. Always cite the specific numbers you're analyzing.
Always use the available tools to get real-time data before responding."#;
