//! Node detail panel payload: UniProt annotation, drug associations, and
//! outbound links, with PubMed citations pulled out of free text.

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::model::Node;

const PUBMED_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov/";
const PATHWAY_COMMONS_SEARCH: &str = "https://apps.pathwaycommons.org/search";
const PFOCR_SEARCH: &str = "https://pfocr.wikipathways.org/search.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PubMedRef {
    pub pmid: String,
    pub url: String,
}

impl PubMedRef {
    fn new(pmid: &str) -> Self {
        Self { pmid: pmid.to_string(), url: format!("{}{}", PUBMED_BASE, pmid) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSegment {
    Text { text: String },
    References { refs: Vec<PubMedRef> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugBadge {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathwayLink {
    pub source: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetails {
    pub id: String,
    pub protein_names: Option<String>,
    pub primary_gene: Option<String>,
    pub synonyms: Option<String>,
    pub function: Vec<TextSegment>,
    pub subcellular_location: Vec<TextSegment>,
    pub drugcentral: Vec<DrugBadge>,
    pub drugbank: Vec<String>,
    pub pathway_links: Vec<PathwayLink>,
}

impl NodeDetails {
    pub fn from_node(node: &Node) -> Self {
        let uniprot = node.uniprot_data.as_ref();

        let drugcentral = node
            .drugcentral_data
            .as_ref()
            .map(|d| {
                d.drug_name
                    .iter()
                    .enumerate()
                    .map(|(i, name)| DrugBadge {
                        name: name.clone(),
                        action_type: d.action_type.get(i).cloned().flatten(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let drugbank = node
            .drugbank_data
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default();

        let mut pathway_links = Vec::new();
        if let Some(entry) = uniprot.and_then(|u| u.entry.as_deref()).filter(|e| !e.is_empty()) {
            if let Ok(url) = Url::parse_with_params(PATHWAY_COMMONS_SEARCH, &[("q", entry)]) {
                pathway_links.push(PathwayLink { source: "pathway_commons", url: url.into() });
            }
        }
        if let Ok(url) = Url::parse_with_params(PFOCR_SEARCH, &[("query", node.id.as_str())]) {
            pathway_links.push(PathwayLink { source: "pfocr", url: url.into() });
        }

        Self {
            id: node.id.clone(),
            protein_names: uniprot.and_then(|u| u.protein_names.clone()),
            primary_gene: uniprot.and_then(|u| u.gene_names_primary.clone()),
            synonyms: uniprot.and_then(|u| u.gene_names_synonym.clone()),
            function: uniprot
                .and_then(|u| u.function.as_deref())
                .map(segment_citations)
                .unwrap_or_default(),
            subcellular_location: uniprot
                .and_then(|u| u.subcellular_location.as_deref())
                .map(segment_citations)
                .unwrap_or_default(),
            drugcentral,
            drugbank,
            pathway_links,
        }
    }
}

fn parenthesised_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").unwrap())
}

fn bare_pmids_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(,\s*\d+)*$").unwrap())
}

/// Splits UniProt free text into plain text and citation groups. A bracketed
/// group is a citation when it mentions `PubMed:` or lists bare PMIDs.
pub fn segment_citations(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut cursor = 0;

    for caps in parenthesised_regex().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let refs = citation_refs(inner.as_str());
        if refs.is_empty() {
            continue;
        }
        pending.push_str(&text[cursor..whole.start()]);
        flush_text(&mut segments, &mut pending);
        segments.push(TextSegment::References { refs });
        cursor = whole.end();
    }

    pending.push_str(&text[cursor..]);
    flush_text(&mut segments, &mut pending);
    segments
}

fn citation_refs(inner: &str) -> Vec<PubMedRef> {
    let inner = inner.trim();
    if !inner.contains("PubMed:") && !bare_pmids_regex().is_match(inner) {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|part| part.trim())
        .map(|part| part.strip_prefix("PubMed:").unwrap_or(part).trim())
        .filter(|pmid| !pmid.is_empty() && pmid.chars().all(|c| c.is_ascii_digit()))
        .map(PubMedRef::new)
        .collect()
}

fn flush_text(segments: &mut Vec<TextSegment>, pending: &mut String) {
    let text = pending.trim();
    if !text.is_empty() {
        segments.push(TextSegment::Text { text: text.to_string() });
    }
    pending.clear();
}
