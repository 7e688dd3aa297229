//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` for Groq's OpenAI-compatible
//! chat-completions API, including native tool calling.

use std::collections::HashMap;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
    tool::{ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq provider configuration
#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// API root URL
    pub api_base: String,

    /// Bearer token; absence is an auth failure at call time
    pub api_key: Option<String>,

    /// Connection timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base: GROQ_API_BASE.into(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl GroqConfig {
    pub fn from_env() -> Self {
        let api_base = std::env::var("GROQ_API_BASE").unwrap_or_else(|_| GROQ_API_BASE.into());
        let api_key = std::env::var("GROQ_API_KEY").ok();

        Self {
            api_base,
            api_key,
            ..Default::default()
        }
    }
}

/// Groq LLM provider
pub struct GroqProvider {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create a new provider with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(GroqConfig {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: GroqConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Create from environment variables (GROQ_API_KEY, GROQ_API_BASE)
    pub fn from_env() -> Self {
        Self::from_config(GroqConfig::from_env())
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::Auth("GROQ_API_KEY is not set".into()))
    }

    /// Convert agent messages to the wire format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                };

                let tool_calls = if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(m.tool_calls.iter().map(WireToolCall::from_call).collect())
                };

                WireMessage {
                    role: role.into(),
                    content: Some(m.content.clone()),
                    tool_calls,
                    tool_call_id: m.tool_call_id.clone(),
                }
            })
            .collect()
    }

    /// Convert tool schemas to OpenAI-style function declarations
    fn convert_tools(tools: &[ToolSchema]) -> Vec<WireTool> {
        tools
            .iter()
            .map(|schema| {
                let mut properties = serde_json::Map::new();
                let mut required = Vec::new();

                for param in &schema.parameters {
                    properties.insert(
                        param.name.clone(),
                        serde_json::json!({
                            "type": param.param_type,
                            "description": param.description,
                        }),
                    );
                    if param.required {
                        required.push(serde_json::Value::String(param.name.clone()));
                    }
                }

                WireTool {
                    kind: "function".into(),
                    function: WireFunction {
                        name: schema.name.clone(),
                        description: schema.description.clone(),
                        parameters: serde_json::json!({
                            "type": "object",
                            "properties": properties,
                            "required": required,
                        }),
                    },
                }
            })
            .collect()
    }

    /// Convert a wire response into an agent completion
    fn convert_completion(response: ChatResponse, model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response carried no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(WireToolCall::into_call)
            .collect::<Result<Vec<_>>>()?;

        let finish_reason = choice.finish_reason.as_deref().map(|reason| match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" => FinishReason::ToolCalls,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        });

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: model.to_string(),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn health_check(&self) -> Result<bool> {
        let Ok(key) = self.api_key() else {
            return Ok(false);
        };

        let url = format!("{}/models", self.config.api_base);
        match self.http.get(&url).bearer_auth(key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let key = self.api_key()?.to_string();

        let request = ChatRequest {
            model: options.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            tools: if tools.is_empty() {
                None
            } else {
                Some(Self::convert_tools(tools))
            },
        };

        let url = format!("{}/chat/completions", self.config.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AgentError::Auth(format!("Groq rejected credentials ({})", status)));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AgentError::RateLimited("Groq rate limit hit".into()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Provider(format!(
                "chat completion returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Self::convert_completion(parsed, &options.model)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    function: WireCallFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCallFunction {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

impl WireToolCall {
    fn from_call(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function".into(),
            function: WireCallFunction {
                name: call.name.clone(),
                arguments: call.arguments_value().to_string(),
            },
        }
    }

    fn into_call(self) -> Result<ToolCall> {
        let arguments: HashMap<String, serde_json::Value> = if self.function.arguments.is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(&self.function.arguments)
                .map_err(|e| AgentError::Provider(format!("malformed tool arguments: {}", e)))?
        };

        Ok(ToolCall {
            name: self.function.name,
            arguments,
            id: Some(
                self.id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GroqConfig::default();
        assert_eq!(config.api_base, GROQ_API_BASE);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            Message::system("You are helpful."),
            Message::user("Hello"),
            Message::tool("42", Some("call_1".into())),
        ];

        let converted = GroqProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[2].role, "tool");
        assert_eq!(converted[2].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_tool_schema_conversion() {
        let schemas = vec![ToolSchema {
            name: "fetch-current-price".into(),
            description: "Price lookup".into(),
            parameters: vec![agent_core::tool::ParameterSchema {
                name: "coin".into(),
                param_type: "string".into(),
                description: "Coin slug".into(),
                required: true,
            }],
            category: None,
        }];

        let wire = GroqProvider::convert_tools(&schemas);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].function.name, "fetch-current-price");
        assert_eq!(wire[0].function.parameters["required"][0], "coin");
    }

    #[test]
    fn test_tool_call_parsing() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "fetch-current-price", "arguments": "{\"coin\": \"bitcoin\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let completion = GroqProvider::convert_completion(response, "test-model").unwrap();

        assert_eq!(completion.tool_calls.len(), 1);
        assert_eq!(completion.tool_calls[0].name, "fetch-current-price");
        assert_eq!(
            completion.tool_calls[0].arguments["coin"],
            serde_json::json!("bitcoin")
        );
        assert_eq!(completion.finish_reason, Some(FinishReason::ToolCalls));
    }
}
