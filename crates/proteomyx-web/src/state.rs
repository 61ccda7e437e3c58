//! Shared application state for the web server.

use std::sync::Arc;

use proteomyx_common::Result;
use proteomyx_config::Config;
use proteomyx_expansion::{ExpansionClient, NetworkSource};
use proteomyx_session::{SessionEvent, SessionManager, SessionSettings};
use tokio::sync::broadcast;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Used directly by the stateless `/network` proxy
    pub expansion: Arc<ExpansionClient>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let expansion = Arc::new(ExpansionClient::from_config(
            &config.expansion,
            config.environment,
        )?);
        let source: Arc<dyn NetworkSource> = expansion.clone();
        let sessions = SessionManager::new(source, SessionSettings::from_config(&config.session));
        Ok(Self {
            config: Arc::new(config),
            expansion,
            sessions,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sessions.subscribe()
    }
}

pub type SharedState = Arc<AppState>;
