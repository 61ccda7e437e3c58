//! proteomyx-expansion: Client for the external network-expansion service.
//!
//! The service grows a protein-interaction network from seed genes
//! (PageRank propagation or subgraph extraction) and answers
//! `GET {base}/return_network/{seeds}/{method}/{interactome}/` with
//! `{ nodes, links }`. This crate only issues that request and checks the
//! response shape; the expansion itself stays on the service side.

pub mod client;

use async_trait::async_trait;
use proteomyx_common::Result;
use proteomyx_graph::{Graph, NetworkRecipe};

pub use client::ExpansionClient;

/// Anything that can turn a recipe into a network snapshot.
#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// One fresh round trip per call. No caching or retries.
    async fn fetch_network(&self, recipe: &NetworkRecipe) -> Result<Graph>;
}
