//! Graph types as delivered by the network-expansion service.
//!
//! Field names follow the service's JSON (`links`, `combined_score`,
//! `Drugcentral_data`, ...). Keys this model does not know about are kept in
//! `extra` so a decoded graph serializes back with the same content.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One immutable network snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, links: Vec<Edge>) -> Self {
        Self { nodes, links, extra: Map::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Highest edge score, or `None` for a graph without edges.
    pub fn max_score(&self) -> Option<f64> {
        self.links.iter().map(Edge::score).reduce(f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Gene symbol.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniprot_data: Option<UniprotData>,
    #[serde(rename = "Drugcentral_data", default, skip_serializing_if = "Option::is_none")]
    pub drugcentral_data: Option<DrugcentralData>,
    #[serde(rename = "Drugbank_data", default, skip_serializing_if = "Option::is_none")]
    pub drugbank_data: Option<DrugbankData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uniprot_data: None,
            drugcentral_data: None,
            drugbank_data: None,
            extra: Map::new(),
        }
    }

    /// Number of drug associations from DrugCentral and DrugBank together.
    pub fn drug_count(&self) -> usize {
        let central = self.drugcentral_data.as_ref().map_or(0, |d| d.drug_name.len());
        let bank = self.drugbank_data.as_ref().map_or(0, |d| d.name.len());
        central + bank
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_score: Option<f64>,
    #[serde(rename = "Omnipath_PPI_data", default, skip_serializing_if = "Option::is_none")]
    pub omnipath_ppi_data: Option<OmnipathPpiData>,
    #[serde(rename = "Omnipath_Enzyme_PTM_data", default, skip_serializing_if = "Option::is_none")]
    pub omnipath_enzyme_ptm_data: Option<OmnipathEnzymePtmData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, combined_score: Option<f64>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            combined_score,
            omnipath_ppi_data: None,
            omnipath_enzyme_ptm_data: None,
            extra: Map::new(),
        }
    }

    /// Score used for filtering and binning. Missing or non-finite scores count as 0.
    pub fn score(&self) -> f64 {
        self.combined_score.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniprotData {
    #[serde(rename = "Entry", skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(rename = "Entry Name", skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,
    #[serde(rename = "Protein names", skip_serializing_if = "Option::is_none")]
    pub protein_names: Option<String>,
    #[serde(rename = "Function [CC]", skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(rename = "Subcellular location [CC]", skip_serializing_if = "Option::is_none")]
    pub subcellular_location: Option<String>,
    #[serde(rename = "Gene Names (primary)", skip_serializing_if = "Option::is_none")]
    pub gene_names_primary: Option<String>,
    #[serde(rename = "Gene Names (synonym)", skip_serializing_if = "Option::is_none")]
    pub gene_names_synonym: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugcentralData {
    #[serde(rename = "GENE", skip_serializing_if = "Option::is_none")]
    pub gene: Option<String>,
    #[serde(rename = "TARGET_CLASS", skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(rename = "TARGET_NAME", skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(rename = "DRUG_NAME")]
    pub drug_name: Vec<String>,
    #[serde(rename = "ACT_COMMENT", deserialize_with = "one_or_many")]
    pub act_comment: Vec<Option<String>>,
    #[serde(rename = "ACTION_TYPE", deserialize_with = "one_or_many")]
    pub action_type: Vec<Option<String>>,
    #[serde(rename = "ACT_SOURCE")]
    pub act_source: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugbankData {
    #[serde(rename = "DrugBank ID")]
    pub drugbank_id: Vec<String>,
    #[serde(rename = "Name")]
    pub name: Vec<String>,
    #[serde(rename = "Type")]
    pub kind: Vec<String>,
    #[serde(rename = "Gene Symbol", skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmnipathPpiData {
    pub sources: Vec<String>,
    pub references_stripped: Vec<String>,
    pub direction: Vec<Value>,
    pub consensus_direction: bool,
    pub consensus_inhibition: bool,
    pub consensus_stimulation: bool,
    pub is_directed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmnipathEnzymePtmData {
    pub sources: Vec<String>,
    pub references_stripped: Vec<String>,
    pub direction: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification: Option<String>,
}

/// DrugCentral sends some columns either as a single string or as a list
/// with null holes. Both decode to a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<Option<String>>),
        One(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::One(s)) => vec![Some(s)],
        Some(Raw::Many(v)) => v,
    })
}
