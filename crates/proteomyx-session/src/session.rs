//! Per-session state machine.
//!
//! ```text
//! Idle ──seeds──▶ Loading ──ok──▶ Ready ──recipe change──▶ Loading
//!                    │                                        │
//!                    └──err──▶ Error ──recipe change/refresh──┘
//! ```
//!
//! Threshold and selection changes never touch the fetch state.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use proteomyx_common::{ProteomyxError, Result};
use proteomyx_graph::details::NodeDetails;
use proteomyx_graph::filter::{apply_filter, FilterOutcome, Subgraph, Threshold};
use proteomyx_graph::histogram::ScoreHistogram;
use proteomyx_graph::styling::{NetworkSummary, RenderHints};
use proteomyx_graph::{ExpansionMethod, Graph, Interactome, NetworkRecipe, Node, SeedList};
use serde::Serialize;
use uuid::Uuid;

use crate::events::{Notification, FETCH_FAILED_NOTICE};

/// Notifications kept per session; older ones are dropped first.
pub const MAX_PENDING_NOTIFICATIONS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error { message: String },
}

/// Issued when a fetch starts. Hand it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub session_id: Uuid,
    pub generation: u64,
    pub recipe: NetworkRecipe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { node_count: usize, edge_count: usize },
    Failed { message: String },
    /// A newer fetch started after this ticket was issued.
    Stale { current_generation: u64 },
}

/// Partial recipe edit. Absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub seeds: Option<SeedList>,
    pub expansion_method: Option<ExpansionMethod>,
    pub interactome: Option<Interactome>,
}

#[derive(Debug, Clone)]
struct LoadedNetwork {
    recipe: NetworkRecipe,
    graph: Graph,
    loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct Selection {
    node: Option<Node>,
    details_open: bool,
}

#[derive(Debug, Clone)]
pub struct ExplorationSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    seeds: Option<SeedList>,
    expansion_method: ExpansionMethod,
    interactome: Interactome,
    phase: Phase,
    generation: u64,
    network: Option<LoadedNetwork>,
    threshold: Threshold,
    view: Option<FilterOutcome>,
    selection: Selection,
    notifications: VecDeque<Notification>,
}

impl ExplorationSession {
    pub fn new(id: Uuid, expansion_method: ExpansionMethod, interactome: Interactome) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            seeds: None,
            expansion_method,
            interactome,
            phase: Phase::Idle,
            generation: 0,
            network: None,
            threshold: Threshold::ZERO,
            view: None,
            selection: Selection::default(),
            notifications: VecDeque::with_capacity(MAX_PENDING_NOTIFICATIONS),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.network.as_ref().map(|n| &n.graph)
    }

    pub fn filtered(&self) -> Option<&FilterOutcome> {
        self.view.as_ref()
    }

    /// Setting seeds always refetches, even when they equal the current ones.
    pub fn set_seeds(&mut self, seeds: SeedList) -> FetchTicket {
        self.seeds = Some(seeds.clone());
        self.start_fetch(seeds)
    }

    pub fn set_expansion_method(&mut self, method: ExpansionMethod) -> Option<FetchTicket> {
        self.update_recipe(RecipeUpdate { expansion_method: Some(method), ..Default::default() })
    }

    pub fn set_interactome(&mut self, interactome: Interactome) -> Option<FetchTicket> {
        self.update_recipe(RecipeUpdate { interactome: Some(interactome), ..Default::default() })
    }

    /// Applies every present field; at most one fetch is started. Method or
    /// interactome changes only fetch when they differ and seeds exist.
    pub fn update_recipe(&mut self, update: RecipeUpdate) -> Option<FetchTicket> {
        let mut changed = false;
        if let Some(method) = update.expansion_method {
            if method != self.expansion_method {
                self.expansion_method = method;
                changed = true;
            }
        }
        if let Some(interactome) = update.interactome {
            if interactome != self.interactome {
                self.interactome = interactome;
                changed = true;
            }
        }
        if let Some(seeds) = update.seeds {
            return Some(self.set_seeds(seeds));
        }
        if !changed {
            return None;
        }
        let seeds = self.seeds.clone()?;
        Some(self.start_fetch(seeds))
    }

    /// Refetches with the current recipe.
    pub fn refresh(&mut self) -> Result<FetchTicket> {
        let seeds = self
            .seeds
            .clone()
            .ok_or_else(|| ProteomyxError::InvalidRequest("no seeds set for this session".into()))?;
        Ok(self.start_fetch(seeds))
    }

    fn start_fetch(&mut self, seeds: SeedList) -> FetchTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        FetchTicket {
            session_id: self.id,
            generation: self.generation,
            recipe: NetworkRecipe::new(seeds, self.expansion_method.clone(), self.interactome.clone()),
        }
    }

    /// Applies a fetch result. Results for superseded tickets change nothing.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<Graph>) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale { current_generation: self.generation };
        }

        match result {
            Ok(graph) => {
                let outcome = apply_filter(&graph, self.threshold);
                let (node_count, edge_count) = (graph.nodes.len(), graph.links.len());
                self.network = Some(LoadedNetwork {
                    recipe: ticket.recipe.clone(),
                    graph,
                    loaded_at: Utc::now(),
                });
                self.view = Some(outcome);
                self.phase = Phase::Ready;
                FetchOutcome::Applied { node_count, edge_count }
            }
            Err(err) => {
                let message = err.to_string();
                self.network = None;
                self.view = None;
                self.phase = Phase::Error { message: message.clone() };
                self.notify(Notification::new(FETCH_FAILED_NOTICE));
                FetchOutcome::Failed { message }
            }
        }
    }

    /// Refilters synchronously when a network is loaded; otherwise the value
    /// applies to the next network that arrives.
    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.threshold = threshold;
        if let Some(network) = &self.network {
            self.view = Some(apply_filter(&network.graph, threshold));
        }
    }

    pub fn reset_threshold(&mut self) {
        self.set_threshold(Threshold::ZERO);
    }

    /// Sets the threshold to the start of histogram bar `index`.
    pub fn select_histogram_bin(&mut self, index: usize) -> Result<Threshold> {
        let threshold = ScoreHistogram::empty()
            .threshold_for_bin(index)
            .ok_or_else(|| ProteomyxError::InvalidRequest(format!("no histogram bin {}", index)))?;
        self.set_threshold(threshold);
        Ok(threshold)
    }

    /// `Some(id)` selects a node of the loaded network and opens its details;
    /// `None` clears the selection.
    pub fn select_node(&mut self, node_id: Option<&str>) -> Result<()> {
        match node_id {
            None => {
                self.selection = Selection::default();
            }
            Some(id) => {
                let node = self
                    .graph()
                    .and_then(|g| g.node(id))
                    .cloned()
                    .ok_or_else(|| ProteomyxError::NodeNotFound(id.to_string()))?;
                self.selection = Selection { node: Some(node), details_open: true };
            }
        }
        Ok(())
    }

    /// Closes the details panel, keeping the selected node.
    pub fn close_details(&mut self) {
        self.selection.details_open = false;
    }

    pub fn selected_details(&self) -> Option<NodeDetails> {
        self.selection.node.as_ref().map(NodeDetails::from_node)
    }

    fn notify(&mut self, notification: Notification) {
        if self.notifications.len() == MAX_PENDING_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let network = match (&self.network, &self.view) {
            (Some(loaded), Some(view)) => Some(NetworkView {
                loaded_at: loaded.loaded_at,
                recipe: loaded.recipe.clone(),
                complete: NetworkSummary {
                    node_count: loaded.graph.nodes.len(),
                    edge_count: loaded.graph.links.len(),
                },
                filtered: view.subgraph.clone(),
                histogram: view.histogram.clone(),
                hints: RenderHints::for_subgraph(
                    &view.subgraph,
                    &loaded.recipe.seeds,
                    &loaded.recipe.expansion_method,
                ),
            }),
            _ => None,
        };

        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            phase: self.phase.clone(),
            generation: self.generation,
            recipe: RecipeView {
                seeds: self.seeds.as_ref().map(|s| s.as_slice().to_vec()).unwrap_or_default(),
                expansion_method: self.expansion_method.clone(),
                interactome: self.interactome.clone(),
                interactome_name: self.interactome.display_name().to_string(),
            },
            show_prompt: self.seeds.is_none() && self.network.is_none(),
            threshold: self.threshold,
            network,
            selection: SelectionView {
                node_id: self.selection.node.as_ref().map(|n| n.id.clone()),
                details_open: self.selection.details_open,
            },
            pending_notifications: self.notifications.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub seeds: Vec<String>,
    pub expansion_method: ExpansionMethod,
    pub interactome: Interactome,
    pub interactome_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkView {
    pub loaded_at: DateTime<Utc>,
    /// Recipe the displayed network was fetched with.
    pub recipe: NetworkRecipe,
    pub complete: NetworkSummary,
    pub filtered: Subgraph,
    pub histogram: ScoreHistogram,
    pub hints: RenderHints,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub node_id: Option<String>,
    pub details_open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub generation: u64,
    pub recipe: RecipeView,
    /// No seeds and nothing loaded: clients ask for network settings.
    pub show_prompt: bool,
    pub threshold: Threshold,
    pub network: Option<NetworkView>,
    pub selection: SelectionView,
    pub pending_notifications: usize,
}
