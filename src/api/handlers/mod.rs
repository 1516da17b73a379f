use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::gateway::GatewayError;
use crate::models::*;
use crate::pipeline::Pipeline;

// ============================================================
// Error Handling
// ============================================================

/// Map a pipeline failure to a status code and body.
///
/// Caller mistakes are returned verbatim as 4xx. Backend failures become
/// 502/503; a malformed graph response carries the raw model output so the
/// operator can see what came back. Storage failures are logged and the
/// client only sees a generic message.
fn pipeline_error(e: PipelineError) -> (StatusCode, String) {
    match e {
        PipelineError::InvalidInput(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        PipelineError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        PipelineError::Precondition(_) => {
            tracing::warn!("Precondition failed: {}", e);
            (StatusCode::CONFLICT, e.to_string())
        }
        PipelineError::Backend(ref err) => {
            tracing::error!("Generation backend error: {}", err);
            let status = match err {
                GatewayError::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
                GatewayError::Permanent { .. } | GatewayError::Config(_) => StatusCode::BAD_GATEWAY,
            };
            (status, e.to_string())
        }
        PipelineError::GraphParse(err) => {
            tracing::error!("Graph parse error: {}\nRaw response: {}", err.reason, err.raw);
            (
                StatusCode::BAD_GATEWAY,
                format!("{}\nRaw LLM response: {}", err, err.raw),
            )
        }
        PipelineError::Storage(_) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Ideas
// ============================================================

pub async fn create_idea(
    State(pipeline): State<Pipeline>,
    Json(input): Json<CreateIdeaInput>,
) -> Result<(StatusCode, Json<IdeaCreated>), (StatusCode, String)> {
    pipeline
        .ingest(&input.text)
        .map(|idea_id| (StatusCode::CREATED, Json(IdeaCreated { idea_id })))
        .map_err(pipeline_error)
}

pub async fn get_idea_status(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdeaStatus>, (StatusCode, String)> {
    pipeline.status(id).map(Json).map_err(pipeline_error)
}

pub async fn get_questions(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionsResponse>, (StatusCode, String)> {
    pipeline
        .generate_questions(id)
        .await
        .map(|questions| Json(QuestionsResponse { questions }))
        .map_err(pipeline_error)
}

pub async fn submit_answers(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
    Json(answers): Json<Answers>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    pipeline
        .submit_answers(id, answers)
        .map(|_| Json(serde_json::json!({ "status": "saved" })))
        .map_err(pipeline_error)
}

// ============================================================
// Graph
// ============================================================

pub async fn get_graph(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<Graph>, (StatusCode, String)> {
    pipeline
        .load_or_build_graph(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

pub async fn rebuild_graph(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<Graph>, (StatusCode, String)> {
    pipeline.build_graph(id).await.map(Json).map_err(pipeline_error)
}

pub async fn build_heuristic_graph(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<Graph>, (StatusCode, String)> {
    pipeline
        .build_heuristic_graph(id)
        .map(Json)
        .map_err(pipeline_error)
}

pub async fn edit_graph(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
    Json(input): Json<EditGraphInput>,
) -> Result<Json<Graph>, (StatusCode, String)> {
    pipeline
        .edit_graph(id, &input.instruction)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

// ============================================================
// Plan
// ============================================================

pub async fn get_plan(
    State(pipeline): State<Pipeline>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    pipeline
        .get_plan(id)
        .await
        .map(|plan| Json(PlanResponse { plan: plan.markdown }))
        .map_err(pipeline_error)
}
