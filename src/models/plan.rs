use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The markdown execution plan for an idea.
///
/// Plan content is opaque text returned by the model. Once stored it is
/// served as-is on every later request; nothing regenerates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub idea_id: Uuid,
    pub markdown: String,
}

/// Response body for plan requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
}

/// Input for editing a graph with a free-text instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditGraphInput {
    pub instruction: String,
}
