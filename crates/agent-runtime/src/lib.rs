//! # agent-runtime
//!
//! Runtime providers for the crypto agent.
//!
//! ## Providers
//!
//! - **Groq** (default): OpenAI-compatible chat completions with tool calling
//! - **OpenAI** (coming soon)
//! - **Anthropic** (coming soon)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::GroqProvider;
//!
//! let provider = GroqProvider::from_env();
//! let agent = Agent::new(Arc::new(provider), tools, config);
//! ```

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "groq")]
pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, AgentResult, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
