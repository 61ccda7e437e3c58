//! Session events broadcast to subscribers and user-facing notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown to the user once per failed fetch.
pub const FETCH_FAILED_NOTICE: &str = "Failed to fetch protein network. Please try again later.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A fetch for a new recipe was started
    FetchStarted {
        session_id: Uuid,
        generation: u64,
        seeds: Vec<String>,
        expansion_method: String,
        interactome: String,
    },
    /// The network arrived and the filtered view was computed
    NetworkReady {
        session_id: Uuid,
        generation: u64,
        node_count: usize,
        edge_count: usize,
    },
    /// The fetch failed; graph state was cleared
    FetchFailed {
        session_id: Uuid,
        generation: u64,
        message: String,
    },
    /// A result for a superseded fetch arrived and was dropped
    StaleResultDiscarded {
        session_id: Uuid,
        generation: u64,
        current_generation: u64,
    },
    SessionClosed { session_id: Uuid },
}

/// Transient, non-fatal message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}
