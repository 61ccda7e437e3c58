//! Score-threshold filtering of a network snapshot.
//!
//! Edges whose combined score is at or above the threshold survive; a node
//! survives only if it is an endpoint of a surviving edge. Input order is kept
//! for both lists. Runs in O(nodes + edges) and holds no state between calls.

use proteomyx_common::ProteomyxError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::histogram::{ScoreHistogram, SCORE_MAX, SCORE_MIN};
use crate::model::{Edge, Graph, Node};

/// Minimum combined score, validated to lie in [0, 1000].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub const ZERO: Threshold = Threshold(0.0);

    pub fn new(value: f64) -> Result<Self, ProteomyxError> {
        if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
            return Err(ProteomyxError::InvalidRequest(format!(
                "threshold must be between {SCORE_MIN} and {SCORE_MAX}, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn admits(&self, edge: &Edge) -> bool {
        edge.score() >= self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ProteomyxError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> f64 {
        t.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Edge>,
}

impl Subgraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }
}

/// Filtered view plus the full-graph histogram for one (graph, threshold) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub threshold: Threshold,
    pub subgraph: Subgraph,
    pub histogram: ScoreHistogram,
}

pub fn filter_graph(graph: &Graph, threshold: Threshold) -> Subgraph {
    let links: Vec<Edge> = graph
        .links
        .iter()
        .filter(|e| threshold.admits(e))
        .cloned()
        .collect();

    let endpoints: HashSet<&str> = links
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    let nodes = graph
        .nodes
        .iter()
        .filter(|n| endpoints.contains(n.id.as_str()))
        .cloned()
        .collect();

    Subgraph { nodes, links }
}

pub fn apply_filter(graph: &Graph, threshold: Threshold) -> FilterOutcome {
    FilterOutcome {
        threshold,
        subgraph: filter_graph(graph, threshold),
        histogram: ScoreHistogram::from_edges(&graph.links),
    }
}
