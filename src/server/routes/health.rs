//! Health check and catalog listing endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::backend::backend_name;
use crate::server::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub backend: String,
    pub classifier: String,
    pub classes: usize,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend_name().to_string(),
        classifier: state.pipeline.classifier().describe(),
        classes: state.pipeline.catalog().len(),
    })
}

/// One catalog entry as exposed over the API
#[derive(Debug, Serialize)]
pub struct ClassSummary {
    pub index: usize,
    pub label: String,
    pub crop: String,
    pub condition: String,
    pub healthy: bool,
    pub advisory: String,
}

/// GET /api/classes - Every class the classifier can predict, in output order
pub async fn list_classes(State(state): State<SharedState>) -> Json<Vec<ClassSummary>> {
    let classes = state
        .pipeline
        .catalog()
        .iter()
        .enumerate()
        .map(|(index, entry)| ClassSummary {
            index,
            label: entry.label.clone(),
            crop: entry.crop.clone(),
            condition: entry.condition.clone(),
            healthy: entry.is_healthy(),
            advisory: entry.advisory.clone(),
        })
        .collect();

    Json(classes)
}
