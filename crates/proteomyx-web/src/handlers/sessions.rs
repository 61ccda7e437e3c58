//! Exploration session endpoints.

use axum::{extract::State, http::StatusCode, Json};
use proteomyx_common::{ApiError, ProteomyxError};
use proteomyx_graph::{ExpansionMethod, Interactome, NodeDetails, SeedList, Threshold};
use proteomyx_session::{Notification, RecipeUpdate, SessionSnapshot};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::extract::{ApiJson, ApiPath};
use crate::state::SharedState;

/// Seeds as typed by a user (`"pln, sln"`) or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedsInput {
    Text(String),
    List(Vec<String>),
}

impl SeedsInput {
    fn into_seeds(self) -> Result<SeedList, ProteomyxError> {
        match self {
            SeedsInput::Text(text) => Ok(SeedList::parse_input(&text)),
            SeedsInput::List(list) => {
                SeedList::new(list.into_iter().map(|s| s.to_uppercase()).collect())
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    pub seeds: Option<SeedsInput>,
    pub expansion_method: Option<String>,
    pub interactome: Option<String>,
}

impl RecipeRequest {
    fn into_update(self) -> Result<RecipeUpdate, ProteomyxError> {
        Ok(RecipeUpdate {
            seeds: self.seeds.map(SeedsInput::into_seeds).transpose()?,
            expansion_method: self.expansion_method.as_deref().map(ExpansionMethod::parse),
            interactome: self.interactome.as_deref().map(Interactome::parse),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ThresholdRequest {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub node_id: Option<String>,
}

type SnapshotResult = Result<Json<SessionSnapshot>, ApiError>;

/// POST /api/sessions
pub async fn create_session(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let snapshot = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/sessions/{id}
pub async fn get_session(State(state): State<SharedState>, ApiPath(id): ApiPath<Uuid>) -> SnapshotResult {
    Ok(Json(state.sessions.snapshot(id).await?))
}

/// DELETE /api/sessions/{id}
pub async fn delete_session(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/{id}/recipe
pub async fn update_recipe(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RecipeRequest>,
) -> SnapshotResult {
    debug!(session_id = %id, ?payload, "Recipe update");
    let update = payload.into_update()?;
    Ok(Json(state.sessions.update_recipe(id, update).await?))
}

/// POST /api/sessions/{id}/refresh
pub async fn refresh(State(state): State<SharedState>, ApiPath(id): ApiPath<Uuid>) -> SnapshotResult {
    Ok(Json(state.sessions.refresh(id).await?))
}

/// PUT /api/sessions/{id}/threshold
pub async fn set_threshold(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ThresholdRequest>,
) -> SnapshotResult {
    let threshold = Threshold::new(payload.value)?;
    Ok(Json(state.sessions.set_threshold(id, threshold).await?))
}

/// DELETE /api/sessions/{id}/threshold
pub async fn reset_threshold(State(state): State<SharedState>, ApiPath(id): ApiPath<Uuid>) -> SnapshotResult {
    Ok(Json(state.sessions.reset_threshold(id).await?))
}

/// POST /api/sessions/{id}/threshold/bin/{index}
pub async fn select_bin(
    State(state): State<SharedState>,
    ApiPath((id, index)): ApiPath<(Uuid, usize)>,
) -> SnapshotResult {
    Ok(Json(state.sessions.select_histogram_bin(id, index).await?))
}

/// PUT /api/sessions/{id}/selection
pub async fn select_node(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SelectionRequest>,
) -> SnapshotResult {
    Ok(Json(state.sessions.select_node(id, payload.node_id.as_deref()).await?))
}

/// DELETE /api/sessions/{id}/selection - closes the details panel
pub async fn close_details(State(state): State<SharedState>, ApiPath(id): ApiPath<Uuid>) -> SnapshotResult {
    Ok(Json(state.sessions.close_details(id).await?))
}

/// GET /api/sessions/{id}/details
pub async fn node_details(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<NodeDetails>, ApiError> {
    state
        .sessions
        .details(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No node selected".into()))
}

/// GET /api/sessions/{id}/notifications - returns and clears pending notifications
pub async fn notifications(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.sessions.drain_notifications(id).await?))
}
