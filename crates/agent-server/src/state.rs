//! Application State

use std::sync::Arc;

use agent_core::Agent;

use crate::ids::IdGenerator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The tool-augmented agent
    pub agent: Arc<Agent>,

    /// Identifier generation capability
    pub ids: Arc<dyn IdGenerator>,

    /// Tool-loop step budget per request
    pub max_tool_steps: usize,
}
