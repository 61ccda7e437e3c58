use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Message returned to HTTP clients whenever the expansion service cannot be reached.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch protein network";

#[derive(Debug, Error)]
pub enum ProteomyxError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Expansion service returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Malformed network response: {0}")]
    MalformedGraph(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Node not found in current network: {0}")]
    NodeNotFound(String),

    #[error("Session limit reached ({0} active sessions)")]
    SessionLimit(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProteomyxError {
    /// True for every failure of the network fetch path: transport errors,
    /// non-success statuses and responses without a usable graph shape.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ProteomyxError::Http(_)
                | ProteomyxError::UpstreamStatus { .. }
                | ProteomyxError::MalformedGraph(_)
                | ProteomyxError::SecurityError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProteomyxError>;

/// Error surfaced by HTTP handlers. Always rendered as `{ "error": msg }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", FETCH_FAILED_MESSAGE)]
    FetchFailed,

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::FetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProteomyxError> for ApiError {
    fn from(err: ProteomyxError) -> Self {
        if err.is_fetch_failure() {
            return ApiError::FetchFailed;
        }
        match err {
            ProteomyxError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            ProteomyxError::SessionNotFound(_) | ProteomyxError::NodeNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ProteomyxError::SessionLimit(_) => ApiError::Unavailable(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

// Extractor rejections become `{ "error": msg }` 400s like any other bad input.

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
