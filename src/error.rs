use thiserror::Error;
use uuid::Uuid;

use crate::gateway::GatewayError;
use crate::parser::GraphParseError;

/// Errors surfaced by pipeline operations.
///
/// The first three variants are caller mistakes; the rest mean the backend
/// or storage misbehaved.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{what} not found for idea {idea_id}")]
    NotFound { what: &'static str, idea_id: Uuid },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Backend(#[from] GatewayError),

    #[error(transparent)]
    GraphParse(#[from] GraphParseError),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn idea_not_found(idea_id: Uuid) -> Self {
        Self::NotFound {
            what: "idea",
            idea_id,
        }
    }

    pub fn graph_not_found(idea_id: Uuid) -> Self {
        Self::NotFound {
            what: "graph",
            idea_id,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
