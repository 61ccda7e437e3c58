//! Session registry. Owns every live session, runs fetches in the background
//! and broadcasts what happened to subscribers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use proteomyx_common::{ProteomyxError, Result};
use proteomyx_config::SessionConfig;
use proteomyx_expansion::NetworkSource;
use proteomyx_graph::details::NodeDetails;
use proteomyx_graph::{ExpansionMethod, Interactome, Threshold};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::{Notification, SessionEvent};
use crate::session::{ExplorationSession, FetchOutcome, FetchTicket, RecipeUpdate, SessionSnapshot};

const EVENT_CAPACITY: usize = 256;
/// Upper bound on the time between idle sweeps.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub max_sessions: usize,
    pub idle_ttl: Duration,
    pub expansion_method: ExpansionMethod,
    pub interactome: Interactome,
}

impl SessionSettings {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            max_sessions: config.max_sessions,
            idle_ttl: Duration::from_secs(config.idle_ttl_secs),
            expansion_method: ExpansionMethod::parse(&config.default_expansion_method),
            interactome: Interactome::parse(&config.default_interactome),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// A session plus the last time a client touched it.
struct Entry {
    session: ExplorationSession,
    last_active: Instant,
}

impl Entry {
    fn new(session: ExplorationSession) -> Self {
        Self { session, last_active: Instant::now() }
    }

    fn touch(&mut self) -> &mut ExplorationSession {
        self.last_active = Instant::now();
        &mut self.session
    }
}

pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    source: Arc<dyn NetworkSource>,
    events: broadcast::Sender<SessionEvent>,
    settings: SessionSettings,
}

impl SessionManager {
    pub fn new(source: Arc<dyn NetworkSource>, settings: SessionSettings) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            source,
            events,
            settings,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn create(&self) -> Result<SessionSnapshot> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.settings.max_sessions {
            self.evict_idle_locked(&mut sessions);
        }
        if sessions.len() >= self.settings.max_sessions {
            warn!(limit = self.settings.max_sessions, "Session limit reached");
            return Err(ProteomyxError::SessionLimit(self.settings.max_sessions));
        }
        let id = Uuid::new_v4();
        let session = ExplorationSession::new(
            id,
            self.settings.expansion_method.clone(),
            self.settings.interactome.clone(),
        );
        let snapshot = session.snapshot();
        sessions.insert(id, Entry::new(session));
        info!(session_id = %id, "Session created");
        Ok(snapshot)
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(id, |s| Ok(s.snapshot())).await
    }

    /// Drops the session. Fetches still in flight for it are ignored on arrival.
    pub async fn close(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .ok_or(ProteomyxError::SessionNotFound(id))?;
        info!(session_id = %id, "Session closed");
        self.publish(SessionEvent::SessionClosed { session_id: id });
        Ok(())
    }

    async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ExplorationSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(ProteomyxError::SessionNotFound(id))?;
        f(entry.touch())
    }

    /// Closes every session idle for at least the configured TTL and
    /// returns their ids.
    pub async fn evict_idle(&self) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        self.evict_idle_locked(&mut sessions)
    }

    fn evict_idle_locked(&self, sessions: &mut HashMap<Uuid, Entry>) -> Vec<Uuid> {
        let now = Instant::now();
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_active) >= self.settings.idle_ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            sessions.remove(id);
            info!(session_id = %id, "Idle session expired");
            self.publish(SessionEvent::SessionClosed { session_id: *id });
        }
        expired
    }

    /// Starts the background task that expires idle sessions. The task ends
    /// once the manager is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::downgrade(self);
        let period = self.settings.idle_ttl.min(MAX_SWEEP_PERIOD);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let Some(manager) = manager.upgrade() else { break };
                let expired = manager.evict_idle().await;
                if !expired.is_empty() {
                    debug!(count = expired.len(), "Idle sweep closed sessions");
                }
            }
        })
    }

    /// Applies a recipe edit and starts a background fetch if it calls for one.
    pub async fn update_recipe(self: &Arc<Self>, id: Uuid, update: RecipeUpdate) -> Result<SessionSnapshot> {
        let (ticket, snapshot) = self
            .with_session(id, |s| {
                let ticket = s.update_recipe(update);
                Ok((ticket, s.snapshot()))
            })
            .await?;
        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
        Ok(snapshot)
    }

    pub async fn refresh(self: &Arc<Self>, id: Uuid) -> Result<SessionSnapshot> {
        let (ticket, snapshot) = self
            .with_session(id, |s| {
                let ticket = s.refresh()?;
                Ok((ticket, s.snapshot()))
            })
            .await?;
        self.dispatch(ticket);
        Ok(snapshot)
    }

    pub async fn set_threshold(&self, id: Uuid, threshold: Threshold) -> Result<SessionSnapshot> {
        self.with_session(id, |s| {
            s.set_threshold(threshold);
            Ok(s.snapshot())
        })
        .await
    }

    pub async fn reset_threshold(&self, id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(id, |s| {
            s.reset_threshold();
            Ok(s.snapshot())
        })
        .await
    }

    pub async fn select_histogram_bin(&self, id: Uuid, index: usize) -> Result<SessionSnapshot> {
        self.with_session(id, |s| {
            s.select_histogram_bin(index)?;
            Ok(s.snapshot())
        })
        .await
    }

    pub async fn select_node(&self, id: Uuid, node_id: Option<&str>) -> Result<SessionSnapshot> {
        self.with_session(id, |s| {
            s.select_node(node_id)?;
            Ok(s.snapshot())
        })
        .await
    }

    pub async fn close_details(&self, id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(id, |s| {
            s.close_details();
            Ok(s.snapshot())
        })
        .await
    }

    pub async fn details(&self, id: Uuid) -> Result<Option<NodeDetails>> {
        self.with_session(id, |s| Ok(s.selected_details())).await
    }

    pub async fn drain_notifications(&self, id: Uuid) -> Result<Vec<Notification>> {
        self.with_session(id, |s| Ok(s.drain_notifications())).await
    }

    fn dispatch(self: &Arc<Self>, ticket: FetchTicket) {
        self.publish(SessionEvent::FetchStarted {
            session_id: ticket.session_id,
            generation: ticket.generation,
            seeds: ticket.recipe.seeds.as_slice().to_vec(),
            expansion_method: ticket.recipe.expansion_method.to_string(),
            interactome: ticket.recipe.interactome.to_string(),
        });
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.run_fetch(ticket).await;
        });
    }

    /// Fetches the ticket's recipe and applies the result to its session.
    /// Returns `None` when the session was closed in the meantime.
    pub async fn run_fetch(&self, ticket: FetchTicket) -> Option<FetchOutcome> {
        let result = self.source.fetch_network(&ticket.recipe).await;
        if let Err(e) = &result {
            warn!(session_id = %ticket.session_id, error = %e, "Network fetch failed");
        }

        let outcome = {
            let mut sessions = self.sessions.write().await;
            let Some(entry) = sessions.get_mut(&ticket.session_id) else {
                debug!(session_id = %ticket.session_id, "Session gone before fetch completed");
                return None;
            };
            entry.session.complete_fetch(&ticket, result)
        };

        let session_id = ticket.session_id;
        let generation = ticket.generation;
        let event = match &outcome {
            FetchOutcome::Applied { node_count, edge_count } => {
                info!(%session_id, generation, node_count, edge_count, "Network loaded");
                SessionEvent::NetworkReady {
                    session_id,
                    generation,
                    node_count: *node_count,
                    edge_count: *edge_count,
                }
            }
            FetchOutcome::Failed { message } => SessionEvent::FetchFailed {
                session_id,
                generation,
                message: message.clone(),
            },
            FetchOutcome::Stale { current_generation } => {
                debug!(%session_id, generation, current_generation, "Discarding stale network");
                SessionEvent::StaleResultDiscarded {
                    session_id,
                    generation,
                    current_generation: *current_generation,
                }
            }
        };
        self.publish(event);
        Some(outcome)
    }
}
