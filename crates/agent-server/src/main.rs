//! Crypto Agent HTTP Server
//!
//! Axum-based server exposing the Lynx crypto agent through the task
//! protocol: utterances in (either caller dialect), task response
//! envelopes out.

mod app;
mod envelope;
mod handlers;
mod ids;
mod protocol;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{Agent, AgentConfig, GenerationOptions, LlmProvider, ToolRegistry};
use agent_runtime::GroqProvider;
use market_data::{CoinDetailsTool, CoinGeckoClient, LYNX_SYSTEM_PROMPT, MarketData, PriceTool, RiskTool};

use crate::ids::ClockIdGenerator;
use crate::state::AppState;

const DEFAULT_MAX_TOOL_STEPS: usize = 6;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider = Arc::new(GroqProvider::from_env());

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Groq"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Groq not reachable - agent requests will fail");
            tracing::warn!("  Set GROQ_API_KEY in .env");
        }
    }

    // Market data gateway shared by all tools
    let gateway: Arc<dyn MarketData> = Arc::new(CoinGeckoClient::from_env());

    // Initialize tools
    let mut tools = ToolRegistry::new();
    tools.register(PriceTool::new(gateway.clone()));
    tools.register(CoinDetailsTool::new(gateway.clone()));
    tools.register(RiskTool::new(gateway));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Assemble the agent
    let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".into());
    let agent = Agent::new(
        provider,
        Arc::new(tools),
        AgentConfig {
            system_prompt: LYNX_SYSTEM_PROMPT.into(),
            generation: GenerationOptions {
                model,
                ..Default::default()
            },
        },
    );

    let max_tool_steps = std::env::var("MAX_TOOL_STEPS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_MAX_TOOL_STEPS);

    let state = AppState {
        agent: Arc::new(agent),
        ids: Arc::new(ClockIdGenerator::new()),
        max_tool_steps,
    };

    let app = app::router(state);

    // Start server
    let addr = match std::env::var("PORT") {
        Ok(port) => format!("0.0.0.0:{}", port),
        Err(_) => std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
    };
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 agent-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /            - Hello");
    tracing::info!("  POST /agent       - Ask the agent (task protocol)");
    tracing::info!("  GET  /test-agent  - Fixed price question (smoke)");
    tracing::info!("  GET  /test-risk   - Fixed risk question (smoke)");

    axum::serve(listener, app).await?;

    Ok(())
}
