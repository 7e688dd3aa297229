//! HTTP Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::envelope::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE, RpcErrorResponse, RpcId};
use crate::protocol::{self, IncomingRequest, resolve_identity};
use crate::state::AppState;

/// Root endpoint
pub async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// Main agent endpoint: accepts either caller dialect, answers with the
/// task response envelope
pub async fn agent_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request = match IncomingRequest::classify(&body) {
        Ok(request) => request,
        Err(e) => {
            // Client error; the runtime is never invoked
            return error_response(
                StatusCode::BAD_REQUEST,
                INVALID_PARAMS_CODE,
                e.to_string(),
                protocol::rpc_id(&body),
            );
        }
    };

    let identity = resolve_identity(&request, state.ids.as_ref());

    match state
        .agent
        .generate(request.utterance(), state.max_tool_steps)
        .await
    {
        Ok(result) => {
            let envelope =
                protocol::build_envelope(&identity, &result, request.utterance(), state.ids.as_ref());
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(e) => {
            tracing::error!("Agent error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_CODE,
                e.user_message(),
                request.rpc_id().cloned(),
            )
        }
    }
}

/// Fixed-utterance smoke endpoint; bypasses the protocol adapter
pub async fn test_agent(State(state): State<AppState>) -> Response {
    match state
        .agent
        .generate("What is the price of Bitcoin?", state.max_tool_steps)
        .await
    {
        Ok(result) => Json(json!({ "response": result })).into_response(),
        Err(e) => {
            tracing::error!("Agent error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message() })),
            )
                .into_response()
        }
    }
}

/// Fixed-utterance risk smoke endpoint; bypasses the protocol adapter
pub async fn test_risk(State(state): State<AppState>) -> Response {
    match state
        .agent
        .generate(
            "What's the risk of investing in Bitcoin right now?",
            state.max_tool_steps,
        )
        .await
    {
        Ok(result) => Json(json!({ "response": result.text })).into_response(),
        Err(e) => {
            tracing::error!("Agent error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message() })),
            )
                .into_response()
        }
    }
}

fn error_response(
    status: StatusCode,
    code: i32,
    message: String,
    id: Option<RpcId>,
) -> Response {
    (status, Json(RpcErrorResponse::new(id, code, message))).into_response()
}
