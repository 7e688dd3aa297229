//! Agent Tools
//!
//! Wraps each gateway capability as a named, schema-validated callable the
//! generation loop may invoke. Upstream failures come back as failed tool
//! results so the model can adapt, never as loop-level faults.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult,
    tool::{ParameterSchema, ToolSchema},
};

use crate::gateway::MarketData;
use crate::risk::assess_risk;

fn coin_parameter(purpose: &str) -> ParameterSchema {
    ParameterSchema {
        name: "coin".into(),
        param_type: "string".into(),
        description: format!("The coin to fetch {} for, e.g., 'bitcoin'", purpose),
        required: true,
    }
}

/// Pull the coin slug out of a validated call
fn coin_argument(call: &ToolCall) -> CoreResult<String> {
    call.arguments
        .get("coin")
        .and_then(|v| v.as_str())
        .map(|coin| coin.trim().to_lowercase())
        .ok_or_else(|| {
            agent_core::AgentError::ToolValidation("Parameter 'coin' must be a string".into())
        })
}

/// Tool for fetching the current price of a coin
pub struct PriceTool {
    gateway: Arc<dyn MarketData>,
}

impl PriceTool {
    pub fn new(gateway: Arc<dyn MarketData>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for PriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fetch-current-price".into(),
            description: "This tool is for fetching the price of a coin".into(),
            parameters: vec![coin_parameter("the price")],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let coin = coin_argument(call)?;

        match self.gateway.fetch_current_price(&coin).await {
            Ok(price) => {
                let change = price.usd_24h_change.unwrap_or(0.0);
                let summary = format!("{}: ${:.2} ({:+.2}% 24h)", coin, price.usd, change);
                Ok(ToolResult::success("fetch-current-price", summary)
                    .with_data(serde_json::to_value(&price)?))
            }
            Err(e) => {
                tracing::warn!(coin = %coin, error = %e, "Price fetch failed");
                Ok(ToolResult::failure(
                    "fetch-current-price",
                    format!("Failed to fetch price for {}", coin),
                ))
            }
        }
    }
}

/// Tool for fetching the detailed market snapshot of a coin
pub struct CoinDetailsTool {
    gateway: Arc<dyn MarketData>,
}

impl CoinDetailsTool {
    pub fn new(gateway: Arc<dyn MarketData>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CoinDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fetch-coin-details".into(),
            description: "This tool is for fetching the details of a coin".into(),
            parameters: vec![coin_parameter("the details")],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let coin = coin_argument(call)?;

        match self.gateway.fetch_coin_details(&coin).await {
            Ok(details) => {
                let summary = format!(
                    "{} ({}): ${:.2}, market cap ${:.0}",
                    details.name,
                    details.symbol,
                    details.market_data.current_price.usd,
                    details.market_data.market_cap.usd,
                );
                Ok(ToolResult::success("fetch-coin-details", summary)
                    .with_data(serde_json::to_value(&details)?))
            }
            Err(e) => {
                tracing::warn!(coin = %coin, error = %e, "Detail fetch failed");
                Ok(ToolResult::failure(
                    "fetch-coin-details",
                    format!("Failed to fetch details for {}", coin),
                ))
            }
        }
    }
}

/// Tool for fetching the risk assessment of a coin
pub struct RiskTool {
    gateway: Arc<dyn MarketData>,
}

impl RiskTool {
    pub fn new(gateway: Arc<dyn MarketData>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for RiskTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fetch-assessment-risk".into(),
            description: "This tool is for fetching the risk assessment of a coin".into(),
            parameters: vec![coin_parameter("the risk assessment")],
            category: Some("analysis".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let coin = coin_argument(call)?;

        match assess_risk(self.gateway.as_ref(), &coin).await {
            Ok(verdict) => {
                let summary = format!(
                    "{}: {} ({:+.2}% 24h) - {}",
                    coin, verdict.risk_level, verdict.volatility, verdict.recommendation
                );
                Ok(ToolResult::success("fetch-assessment-risk", summary)
                    .with_data(serde_json::to_value(&verdict)?))
            }
            Err(e) => {
                tracing::warn!(coin = %coin, error = %e, "Risk assessment failed");
                Ok(ToolResult::failure(
                    "fetch-assessment-risk",
                    format!("Failed to assess risk for {}", coin),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MarketDataError, Result};
    use crate::gateway::{CoinDetails, PricePoint};

    /// Gateway stub with a single fixed quote
    struct StubGateway {
        point: Option<PricePoint>,
    }

    #[async_trait]
    impl MarketData for StubGateway {
        async fn fetch_current_price(&self, coin: &str) -> Result<PricePoint> {
            self.point
                .clone()
                .ok_or_else(|| MarketDataError::PriceUnavailable(coin.into()))
        }

        async fn fetch_coin_details(&self, coin: &str) -> Result<CoinDetails> {
            Err(MarketDataError::PriceUnavailable(coin.into()))
        }
    }

    fn stub(point: Option<PricePoint>) -> Arc<dyn MarketData> {
        Arc::new(StubGateway { point })
    }

    fn call(coin: &str) -> ToolCall {
        ToolCall::new("fetch-current-price").with_argument("coin", serde_json::json!(coin))
    }

    #[test]
    fn schemas_require_the_coin_parameter() {
        let tool = PriceTool::new(stub(None));
        let schema = tool.schema();
        assert_eq!(schema.name, "fetch-current-price");
        assert!(schema.parameters.iter().any(|p| p.name == "coin" && p.required));
    }

    #[tokio::test]
    async fn price_tool_returns_structured_data() {
        let tool = PriceTool::new(stub(Some(PricePoint {
            usd: 50000.0,
            usd_24h_change: Some(1.0),
        })));

        let result = tool.execute(&call("Bitcoin")).await.unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["usd"], 50000.0);
        assert_eq!(data["usd_24h_change"], 1.0);
    }

    #[tokio::test]
    async fn upstream_failure_becomes_failed_result() {
        let tool = PriceTool::new(stub(None));

        let result = tool.execute(&call("bitcoin")).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("bitcoin"));
    }

    #[tokio::test]
    async fn risk_tool_classifies_through_the_gateway() {
        let tool = RiskTool::new(stub(Some(PricePoint {
            usd: 50000.0,
            usd_24h_change: Some(1.5),
        })));

        let result = tool
            .execute(&ToolCall::new("fetch-assessment-risk").with_argument("coin", serde_json::json!("bitcoin")))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()["riskLevel"], "Low Risk");
    }

    #[tokio::test]
    async fn non_string_coin_is_a_validation_error() {
        let tool = PriceTool::new(stub(None));
        let bad = ToolCall::new("fetch-current-price").with_argument("coin", serde_json::json!(42));

        let err = tool.execute(&bad).await.unwrap_err();
        assert!(matches!(err, agent_core::AgentError::ToolValidation(_)));
    }
}
