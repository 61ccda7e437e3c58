//! Per-element rendering hints for graph clients.

use serde::Serialize;

use crate::filter::Subgraph;
use crate::model::{Edge, Node};
use crate::recipe::{ExpansionMethod, SeedList};

/// Label shown next to a node; drug-associated nodes carry a pill marker and count.
pub fn node_label(node: &Node) -> String {
    match node.drug_count() {
        0 => node.id.clone(),
        n => format!("{} 💊 {}", node.id, n),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Seed,
    Expanded,
}

impl NodeRole {
    /// Seeds are only singled out when the method grew the network around them.
    pub fn of(node: &Node, seeds: &SeedList, method: &ExpansionMethod) -> Self {
        if *method != ExpansionMethod::Subgraph && seeds.contains(&node.id) {
            NodeRole::Seed
        } else {
            NodeRole::Expanded
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Inhibition,
    Stimulation,
    EnzymePtm,
    Unannotated,
}

impl LinkKind {
    pub fn of(edge: &Edge) -> Self {
        if let Some(ppi) = &edge.omnipath_ppi_data {
            if ppi.consensus_inhibition {
                return LinkKind::Inhibition;
            }
            if ppi.consensus_stimulation {
                return LinkKind::Stimulation;
            }
        }
        if edge.omnipath_enzyme_ptm_data.is_some() {
            LinkKind::EnzymePtm
        } else {
            LinkKind::Unannotated
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LinkKind::Inhibition => "#FF0000",
            LinkKind::Stimulation => "#008000",
            LinkKind::EnzymePtm => "#0000FF",
            LinkKind::Unannotated => "#808080",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeHint {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkHint {
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderHints {
    pub summary: NetworkSummary,
    pub nodes: Vec<NodeHint>,
    pub links: Vec<LinkHint>,
}

impl RenderHints {
    pub fn for_subgraph(subgraph: &Subgraph, seeds: &SeedList, method: &ExpansionMethod) -> Self {
        let nodes = subgraph
            .nodes
            .iter()
            .map(|n| NodeHint {
                id: n.id.clone(),
                label: node_label(n),
                role: NodeRole::of(n, seeds, method),
            })
            .collect();
        let links = subgraph
            .links
            .iter()
            .map(|e| {
                let kind = LinkKind::of(e);
                LinkHint {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    kind,
                    color: kind.color(),
                }
            })
            .collect();

        Self {
            summary: NetworkSummary {
                node_count: subgraph.node_count(),
                edge_count: subgraph.edge_count(),
            },
            nodes,
            links,
        }
    }
}
