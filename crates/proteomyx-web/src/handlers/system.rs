//! Service health.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: proteomyx_config::Environment,
    pub expansion_service: String,
    pub sessions: usize,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "proteomyx",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment,
        expansion_service: state.expansion.service_url().to_string(),
        sessions: state.sessions.count().await,
    })
}
