//! Task Response Wire Types
//!
//! The outbound JSON-RPC/task envelope the adapter emits, trimmed to the
//! subset this service produces. Field names follow the calling protocol's
//! camelCase conventions.

use serde::{Deserialize, Serialize};

/// Error code for invalid/missing request parameters
pub const INVALID_PARAMS_CODE: i32 = -32602;

/// Error code for internal server failures
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// A JSON-RPC 2.0 identifier: string, number, or null
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RpcId {
    String(String),
    Integer(i64),
    Null,
}

/// Successful response: correlation id plus the task result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    pub id: RpcId,
    pub result: Task,
}

/// Error response per the JSON-RPC error contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Echoes the request id when known, null otherwise
    pub id: RpcId,
    pub error: RpcError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcErrorResponse {
    pub fn new(id: Option<RpcId>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: id.unwrap_or(RpcId::Null),
            error: RpcError {
                code,
                message: message.into(),
            },
        }
    }
}

/// One unit of agent work in the calling protocol's vocabulary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Discriminator, always "task"
    #[serde(default = "default_task_kind")]
    pub kind: String,
    pub id: String,
    #[serde(rename = "contextId")]
    pub context_id: String,
    pub status: TaskStatus,
    pub artifacts: Vec<Artifact>,
    pub history: Vec<TaskMessage>,
}

fn default_task_kind() -> String {
    "task".into()
}

/// Lifecycle states this service emits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    /// ISO 8601 datetime of response construction
    pub timestamp: String,
}

/// Sender of a task message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// A message in the task history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskMessage {
    /// Discriminator, always "message"
    #[serde(default = "default_message_kind")]
    pub kind: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    #[serde(rename = "taskId")]
    pub task_id: String,
}

fn default_message_kind() -> String {
    "message".into()
}

/// A content part of a message or artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// A text segment
    Text { text: String },
    /// A structured data segment
    Data { data: serde_json::Value },
}

/// A named, typed piece of output attached to the task result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    #[serde(rename = "artifactId")]
    pub artifact_id: String,
    pub name: String,
    pub parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_id_roundtrips_all_shapes() {
        for (json, id) in [
            (r#""abc""#, RpcId::String("abc".into())),
            ("7", RpcId::Integer(7)),
            ("null", RpcId::Null),
        ] {
            let parsed: RpcId = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, id);
            assert_eq!(serde_json::to_string(&id).unwrap(), json);
        }
    }

    #[test]
    fn parts_serialize_with_kind_discriminator() {
        let text = serde_json::to_value(Part::Text { text: "hi".into() }).unwrap();
        assert_eq!(text["kind"], "text");

        let data = serde_json::to_value(Part::Data {
            data: serde_json::json!({"usd": 1}),
        })
        .unwrap();
        assert_eq!(data["kind"], "data");
        assert_eq!(data["data"]["usd"], 1);
    }

    #[test]
    fn error_response_defaults_to_null_id() {
        let body = serde_json::to_value(RpcErrorResponse::new(
            None,
            INVALID_PARAMS_CODE,
            "Invalid params: message is required",
        ))
        .unwrap();
        assert!(body["id"].is_null());
        assert_eq!(body["error"]["code"], -32602);
    }
}
