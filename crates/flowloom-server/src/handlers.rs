use axum::Json;
use axum::extract::State;
use flowloom_core::Workflow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for workflow generation. An empty description is valid
/// (if rarely useful) input.
#[derive(Debug, Deserialize)]
pub struct GenerateWorkflowRequest {
    pub description: String,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /api/generate-workflow
///
/// The response body is the canonical workflow JSON itself, unwrapped.
pub async fn generate_workflow(
    State(state): State<AppState>,
    Json(request): Json<GenerateWorkflowRequest>,
) -> Result<Json<Workflow>, ApiError> {
    let workflow = state
        .generator
        .generate(
            &request.description,
            request.engine.as_deref(),
            request.model.as_deref(),
        )
        .await?;

    if let Ok(pretty) = serde_json::to_string_pretty(&workflow) {
        debug!("final workflow:\n{pretty}");
    }

    Ok(Json(workflow))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}
