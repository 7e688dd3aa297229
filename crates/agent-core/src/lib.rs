//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction and extensible tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Generation  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Groq, OpenAI, Anthropic,
//! or any other provider without changing agent logic. The generation loop is
//! an explicit bounded iteration: completion in, tool calls out, tool results
//! back in, until the model answers or the step budget is spent.

pub mod provider;
pub mod tool;
pub mod runtime;
pub mod message;
pub mod error;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use runtime::{Agent, AgentConfig, AgentResult, ToolInvocationRecord};
pub use tool::{Tool, ToolCall, ToolResult, ToolRegistry};
