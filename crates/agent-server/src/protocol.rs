//! Protocol Adapter
//!
//! Translates between heterogeneous caller dialects and the canonical task
//! response. Inbound bodies arrive untyped; classification turns them into a
//! discriminated request, identity resolution echoes or mints correlation
//! ids, and envelope construction serializes the agent result.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use agent_core::AgentResult;

use crate::envelope::{
    Artifact, MessageRole, Part, RpcId, SendMessageResponse, Task, TaskMessage, TaskState,
    TaskStatus,
};
use crate::ids::IdGenerator;

/// Name of the artifact carrying the answer text
const ANSWER_ARTIFACT_NAME: &str = "cryptoAgentResponse";

/// Name of the artifact carrying tool invocation records
const TOOL_ARTIFACT_NAME: &str = "ToolResults";

/// Adapter-level failures; all of them are client errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// Neither dialect yielded a non-empty utterance
    #[error("Invalid params: message is required")]
    MissingMessage,
}

/// An inbound request, reduced to one of the supported dialects
#[derive(Clone, Debug, PartialEq)]
pub enum IncomingRequest {
    /// JSON-RPC envelope dialect: `params.message.parts[0].text`
    Envelope(EnvelopeRequest),
    /// Legacy direct-call dialect: top-level `message` string
    Legacy(LegacyRequest),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnvelopeRequest {
    pub id: Option<RpcId>,
    pub utterance: String,
    pub message_id: Option<String>,
    pub task_id: Option<String>,
    pub context_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegacyRequest {
    pub id: Option<RpcId>,
    pub utterance: String,
}

// Tolerant views over the raw body; no schema is enforced on receipt.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawParams {
    message: Option<RawMessage>,
    #[serde(rename = "contextId")]
    context_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMessage {
    parts: Vec<RawPart>,
    #[serde(rename = "messageId")]
    message_id: Option<String>,
    #[serde(rename = "taskId")]
    task_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPart {
    text: Option<String>,
}

impl IncomingRequest {
    /// Detect the dialect of a raw body and extract its utterance.
    ///
    /// Precedence: the envelope's first message part wins over the legacy
    /// top-level `message`; the first non-empty match decides the dialect.
    /// No merging of multiple parts. A body matching neither dialect is the
    /// `MissingMessage` client error.
    pub fn classify(body: &serde_json::Value) -> Result<IncomingRequest, ProtocolError> {
        let id = rpc_id(body);

        if let Some(envelope) = Self::try_envelope(body, id.clone()) {
            return Ok(IncomingRequest::Envelope(envelope));
        }

        if let Some(legacy) = Self::try_legacy(body, id) {
            return Ok(IncomingRequest::Legacy(legacy));
        }

        Err(ProtocolError::MissingMessage)
    }

    fn try_envelope(body: &serde_json::Value, id: Option<RpcId>) -> Option<EnvelopeRequest> {
        let params: RawParams = serde_json::from_value(body.get("params")?.clone()).ok()?;
        let message = params.message?;
        let utterance = message
            .parts
            .first()
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())?
            .to_string();

        Some(EnvelopeRequest {
            id,
            utterance,
            message_id: message.message_id,
            task_id: message.task_id,
            context_id: params.context_id,
        })
    }

    fn try_legacy(body: &serde_json::Value, id: Option<RpcId>) -> Option<LegacyRequest> {
        let utterance = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|text| !text.is_empty())?
            .to_string();

        Some(LegacyRequest { id, utterance })
    }

    /// The extracted utterance; dialect-independent
    pub fn utterance(&self) -> &str {
        match self {
            IncomingRequest::Envelope(request) => &request.utterance,
            IncomingRequest::Legacy(request) => &request.utterance,
        }
    }

    /// The JSON-RPC id as sent by the caller, if any
    pub fn rpc_id(&self) -> Option<&RpcId> {
        match self {
            IncomingRequest::Envelope(request) => request.id.as_ref(),
            IncomingRequest::Legacy(request) => request.id.as_ref(),
        }
    }
}

/// Read the JSON-RPC id off a raw body, for error paths where
/// classification never ran or failed. An explicit null counts as absent.
pub fn rpc_id(body: &serde_json::Value) -> Option<RpcId> {
    let id = body.get("id")?;
    if id.is_null() {
        return None;
    }
    serde_json::from_value(id.clone()).ok()
}

/// Correlation identifiers for one task
#[derive(Clone, Debug, PartialEq)]
pub struct TaskIdentity {
    pub request_id: RpcId,
    pub task_id: String,
    pub context_id: String,
    pub message_id: String,
}

/// Echo identifiers present in the request unchanged; mint the rest.
///
/// Pure apart from identifier generation, and total: it cannot fail.
pub fn resolve_identity(request: &IncomingRequest, ids: &dyn IdGenerator) -> TaskIdentity {
    let request_id = request
        .rpc_id()
        .cloned()
        .unwrap_or_else(|| RpcId::String(ids.generate("task")));

    match request {
        IncomingRequest::Envelope(request) => TaskIdentity {
            request_id,
            task_id: request
                .task_id
                .clone()
                .unwrap_or_else(|| ids.generate("task")),
            context_id: request
                .context_id
                .clone()
                .unwrap_or_else(|| ids.generate("context")),
            message_id: request
                .message_id
                .clone()
                .unwrap_or_else(|| ids.generate("msg")),
        },
        IncomingRequest::Legacy(_) => TaskIdentity {
            request_id,
            task_id: ids.generate("task"),
            context_id: ids.generate("context"),
            message_id: ids.generate("msg"),
        },
    }
}

/// Serialize an agent result into the task response envelope.
///
/// Always one text artifact carrying the answer; a second data artifact
/// with one part per tool invocation when any ran; history pairing the
/// original utterance with the generated text, both tagged with the task id.
pub fn build_envelope(
    identity: &TaskIdentity,
    result: &AgentResult,
    utterance: &str,
    ids: &dyn IdGenerator,
) -> SendMessageResponse {
    let mut artifacts = vec![Artifact {
        artifact_id: ids.generate("artifact"),
        name: ANSWER_ARTIFACT_NAME.into(),
        parts: vec![Part::Text {
            text: result.text.clone(),
        }],
    }];

    if !result.tool_invocations.is_empty() {
        artifacts.push(Artifact {
            artifact_id: ids.generate("artifact"),
            name: TOOL_ARTIFACT_NAME.into(),
            parts: result
                .tool_invocations
                .iter()
                .map(|record| Part::Data {
                    data: serde_json::json!({
                        "toolName": record.tool_name,
                        "input": record.input,
                        "output": record.output,
                    }),
                })
                .collect(),
        });
    }

    let response_message_id = ids.generate("msg");
    let history = vec![
        TaskMessage {
            kind: "message".into(),
            message_id: identity.message_id.clone(),
            role: MessageRole::User,
            parts: vec![Part::Text {
                text: utterance.into(),
            }],
            task_id: identity.task_id.clone(),
        },
        TaskMessage {
            kind: "message".into(),
            message_id: response_message_id,
            role: MessageRole::Agent,
            parts: vec![Part::Text {
                text: result.text.clone(),
            }],
            task_id: identity.task_id.clone(),
        },
    ];

    SendMessageResponse {
        jsonrpc: "2.0".into(),
        id: identity.request_id.clone(),
        result: Task {
            kind: "task".into(),
            id: identity.task_id.clone(),
            context_id: identity.context_id.clone(),
            status: TaskStatus {
                state: TaskState::Completed,
                timestamp: Utc::now().to_rfc3339(),
            },
            artifacts,
            history,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use agent_core::ToolInvocationRecord;
    use serde_json::json;

    fn envelope_body(text: &str) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "method": "message/send",
            "params": {
                "message": {
                    "parts": [{"kind": "text", "text": text}],
                    "messageId": "msg-abc",
                    "taskId": "task-abc"
                },
                "contextId": "ctx-abc"
            }
        })
    }

    #[test]
    fn both_dialects_yield_the_same_utterance() {
        let question = "What is the price of Bitcoin?";
        let legacy = IncomingRequest::classify(&json!({"message": question})).unwrap();
        let envelope = IncomingRequest::classify(&envelope_body(question)).unwrap();

        assert_eq!(legacy.utterance(), question);
        assert_eq!(envelope.utterance(), question);
        assert!(matches!(legacy, IncomingRequest::Legacy(_)));
        assert!(matches!(envelope, IncomingRequest::Envelope(_)));
    }

    #[test]
    fn envelope_part_wins_over_legacy_message() {
        let mut body = envelope_body("from the envelope");
        body["message"] = json!("from the legacy field");

        let request = IncomingRequest::classify(&body).unwrap();
        assert_eq!(request.utterance(), "from the envelope");
    }

    #[test]
    fn empty_envelope_part_falls_back_to_legacy() {
        let mut body = envelope_body("");
        body["message"] = json!("from the legacy field");

        let request = IncomingRequest::classify(&body).unwrap();
        assert_eq!(request.utterance(), "from the legacy field");
    }

    #[test]
    fn bodies_without_an_utterance_are_rejected() {
        for body in [
            json!({}),
            json!({"message": ""}),
            json!({"message": 42}),
            json!({"params": {"message": {"parts": []}}}),
            json!({"params": {"message": {"parts": [{"kind": "data", "data": {}}]}}}),
        ] {
            assert_eq!(
                IncomingRequest::classify(&body).unwrap_err(),
                ProtocolError::MissingMessage
            );
        }
    }

    #[test]
    fn identity_echoes_populated_fields_unchanged() {
        let ids = SequentialIdGenerator::new();
        let request = IncomingRequest::classify(&envelope_body("hello")).unwrap();

        let first = resolve_identity(&request, &ids);
        let second = resolve_identity(&request, &ids);

        assert_eq!(first.request_id, RpcId::String("req-1".into()));
        assert_eq!(first.task_id, "task-abc");
        assert_eq!(first.context_id, "ctx-abc");
        assert_eq!(first.message_id, "msg-abc");
        // Re-resolving fully-populated identity changes nothing
        assert_eq!(first, second);
    }

    #[test]
    fn identity_mints_absent_fields() {
        let ids = SequentialIdGenerator::new();
        let request = IncomingRequest::classify(&json!({"message": "hello"})).unwrap();

        let identity = resolve_identity(&request, &ids);
        assert_eq!(identity.request_id, RpcId::String("task-1".into()));
        assert!(identity.task_id.starts_with("task-"));
        assert!(identity.context_id.starts_with("context-"));
        assert!(identity.message_id.starts_with("msg-"));
    }

    #[test]
    fn numeric_request_ids_are_echoed() {
        let ids = SequentialIdGenerator::new();
        let request = IncomingRequest::classify(&json!({"id": 7, "message": "hello"})).unwrap();

        let identity = resolve_identity(&request, &ids);
        assert_eq!(identity.request_id, RpcId::Integer(7));
    }

    #[test]
    fn envelope_round_trip_preserves_text_and_tool_records() {
        let ids = SequentialIdGenerator::new();
        let identity = TaskIdentity {
            request_id: RpcId::String("req-1".into()),
            task_id: "task-abc".into(),
            context_id: "ctx-abc".into(),
            message_id: "msg-abc".into(),
        };
        let result = AgentResult {
            text: "BTC is $50000, up 1%".into(),
            tool_invocations: vec![ToolInvocationRecord {
                tool_name: "fetch-current-price".into(),
                input: json!({"coin": "bitcoin"}),
                output: json!({"usd": 50000, "usd_24h_change": 1}),
            }],
        };

        let response = build_envelope(&identity, &result, "What about BTC?", &ids);
        let task = &response.result;

        assert_eq!(response.id, RpcId::String("req-1".into()));
        assert_eq!(task.status.state, TaskState::Completed);

        // First artifact: the answer text, verbatim
        assert_eq!(task.artifacts[0].name, "cryptoAgentResponse");
        assert_eq!(
            task.artifacts[0].parts[0],
            Part::Text {
                text: "BTC is $50000, up 1%".into()
            }
        );

        // Second artifact: exactly one data part matching the record
        assert_eq!(task.artifacts.len(), 2);
        assert_eq!(task.artifacts[1].name, "ToolResults");
        assert_eq!(task.artifacts[1].parts.len(), 1);
        assert_eq!(
            task.artifacts[1].parts[0],
            Part::Data {
                data: json!({
                    "toolName": "fetch-current-price",
                    "input": {"coin": "bitcoin"},
                    "output": {"usd": 50000, "usd_24h_change": 1},
                })
            }
        );

        // History pairs the utterance with the generated text
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.history[0].role, MessageRole::User);
        assert_eq!(task.history[0].message_id, "msg-abc");
        assert_eq!(task.history[1].role, MessageRole::Agent);
        assert_eq!(task.history[1].task_id, "task-abc");
        assert_ne!(task.history[1].message_id, task.history[0].message_id);
    }

    #[test]
    fn tool_free_results_produce_a_single_artifact() {
        let ids = SequentialIdGenerator::new();
        let identity = TaskIdentity {
            request_id: RpcId::Integer(1),
            task_id: "task-1".into(),
            context_id: "ctx-1".into(),
            message_id: "msg-1".into(),
        };
        let result = AgentResult {
            text: "Bitcoin is $64000".into(),
            tool_invocations: Vec::new(),
        };

        let response = build_envelope(&identity, &result, "price?", &ids);
        assert_eq!(response.result.artifacts.len(), 1);
    }
}
