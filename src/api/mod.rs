mod handlers;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::pipeline::Pipeline;

/// Build the HTTP router. An empty `cors_origins` list allows any origin.
pub fn create_router(pipeline: Pipeline, cors_origins: &[String]) -> Router {
    let api = Router::new()
        // Ideas
        .route("/ideas", post(handlers::create_idea))
        .route("/ideas/{id}", get(handlers::get_idea_status))
        .route("/ideas/{id}/questions", get(handlers::get_questions))
        .route("/ideas/{id}/answers", post(handlers::submit_answers))
        // Graph
        .route(
            "/ideas/{id}/graph",
            get(handlers::get_graph).post(handlers::rebuild_graph),
        )
        .route("/ideas/{id}/graph/heuristic", post(handlers::build_heuristic_graph))
        .route("/ideas/{id}/graph/edit", post(handlers::edit_graph))
        // Plan
        .route("/ideas/{id}/plan", get(handlers::get_plan))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(pipeline)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
