//! Router Assembly

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{agent_handler, hello, test_agent, test_risk};
use crate::state::AppState;

/// Build the application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/agent", post(agent_handler))
        .route("/test-agent", get(test_agent))
        .route("/test-risk", get(test_risk))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
