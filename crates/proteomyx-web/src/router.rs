//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    network::get_network,
    sessions::{
        create_session, get_session, delete_session, update_recipe, refresh,
        set_threshold, reset_threshold, select_bin, select_node, close_details,
        node_details, notifications,
    },
    system::health,
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Proxy
        .route("/network",              get(get_network))
        .route("/api/protein-network",  get(get_network))

        // Sessions
        .route("/api/sessions",                 post(create_session))
        .route("/api/sessions/{id}",            get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/recipe",     put(update_recipe))
        .route("/api/sessions/{id}/refresh",    post(refresh))
        .route("/api/sessions/{id}/threshold",  put(set_threshold).delete(reset_threshold))
        .route("/api/sessions/{id}/threshold/bin/{index}", post(select_bin))
        .route("/api/sessions/{id}/selection",  put(select_node).delete(close_details))
        .route("/api/sessions/{id}/details",    get(node_details))
        .route("/api/sessions/{id}/notifications", get(notifications))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        .route("/health", get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
