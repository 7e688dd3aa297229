//! Generation Runtime
//!
//! Drives a tool-augmented generation step to completion: the model may
//! request tool calls, each is executed against the registry and its result
//! fed back, until the model answers or the step budget runs out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt (persona + tool-use policy)
    pub system_prompt: String,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

Use the available tools when you need external data, then synthesize the
results into a helpful response. If you can answer directly without tools,
do so. Be concise and accurate."#;

/// Record of one executed tool call, in invocation order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolInvocationRecord {
    /// Tool identifier
    #[serde(rename = "toolName")]
    pub tool_name: String,

    /// Arguments the call was made with
    pub input: serde_json::Value,

    /// Structured output on success, error text on failure
    pub output: serde_json::Value,
}

/// Outcome of one generation step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentResult {
    /// Final answer text
    pub text: String,

    /// Tool calls executed while producing the answer
    #[serde(rename = "toolInvocations", default)]
    pub tool_invocations: Vec<ToolInvocationRecord>,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Run one tool-augmented generation step for a single utterance.
    ///
    /// Single-request, single-turn: no memory of prior requests. The loop
    /// terminates when the model answers without tool calls, or when
    /// `max_tool_steps` rounds of tool execution have been spent — in which
    /// case the last completion text is returned rather than an error, so
    /// the boundary never hangs on a tool-happy model.
    pub async fn generate(&self, utterance: &str, max_tool_steps: usize) -> Result<AgentResult> {
        let mut messages = vec![
            Message::system(&self.config.system_prompt),
            Message::user(utterance),
        ];
        let schemas = self.tools.schemas();
        let mut invocations = Vec::new();
        let mut steps = 0;

        loop {
            let completion = self
                .provider
                .complete(&messages, &schemas, &self.config.generation)
                .await?;

            if completion.tool_calls.is_empty() {
                return Ok(AgentResult {
                    text: completion.content,
                    tool_invocations: invocations,
                });
            }

            if steps >= max_tool_steps {
                tracing::warn!(steps, "tool step budget exhausted, returning last completion");
                return Ok(AgentResult {
                    text: completion.content,
                    tool_invocations: invocations,
                });
            }
            steps += 1;

            messages.push(Message::assistant_with_calls(
                &completion.content,
                completion.tool_calls.clone(),
            ));

            // Execute requested calls in order, even when one turn asks for several
            for call in &completion.tool_calls {
                tracing::debug!(tool = %call.name, "Executing tool");
                let result = self.execute_tool(call).await;

                invocations.push(ToolInvocationRecord {
                    tool_name: call.name.clone(),
                    input: call.arguments_value(),
                    output: record_output(&result),
                });

                messages.push(Message::tool(
                    format_tool_result(&result),
                    call.id.clone(),
                ));
            }
        }
    }

    /// Execute a tool call, absorbing tool-level failures into a failed
    /// result the model can react to
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {}", e),
                    data: None,
                }
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Structured data when the tool produced it, its text output otherwise
fn record_output(result: &ToolResult) -> serde_json::Value {
    match &result.data {
        Some(data) if result.success => data.clone(),
        _ => serde_json::Value::String(result.output.clone()),
    }
}

/// Format a tool result for the conversation context
fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        match &result.data {
            Some(data) => data.to_string(),
            None => result.output.clone(),
        }
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}
