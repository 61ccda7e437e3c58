//! proteomyx-graph: Protein-interaction graph model and the pure computations
//! run over it: score filtering, histogram binning, rendering hints and node details.

pub mod model;
pub mod recipe;
pub mod filter;
pub mod histogram;
pub mod styling;
pub mod details;

pub use model::{Edge, Graph, Node};
pub use recipe::{ExpansionMethod, Interactome, NetworkRecipe, SeedList};
pub use filter::{apply_filter, filter_graph, FilterOutcome, Subgraph, Threshold};
pub use histogram::{HistogramBin, ScoreHistogram, HISTOGRAM_BINS, SCORE_MAX};
pub use details::NodeDetails;
