//! Network recipe: which seeds to expand, how, and over which interactome.

use proteomyx_common::ProteomyxError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Seeds used when the user submits an empty seed form.
pub const DEFAULT_SEEDS: [&str; 2] = ["PLN", "SLN"];

/// A non-empty, ordered list of seed gene identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeedList(Vec<String>);

impl SeedList {
    pub fn new(seeds: Vec<String>) -> Result<Self, ProteomyxError> {
        let seeds: Vec<String> = seeds
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if seeds.is_empty() {
            return Err(ProteomyxError::InvalidRequest("seed list is empty".into()));
        }
        Ok(Self(seeds))
    }

    /// Parses what a user typed into the seed form: comma separated, upper-cased.
    /// Blank input falls back to [`DEFAULT_SEEDS`].
    pub fn parse_input(input: &str) -> Self {
        let seeds: Vec<String> = input
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if seeds.is_empty() {
            return Self::defaults();
        }
        Self(seeds)
    }

    /// Parses the `seeds` query parameter of the proxy endpoint. Case is left
    /// untouched.
    pub fn from_query(raw: &str) -> Result<Self, ProteomyxError> {
        Self::new(raw.split(',').map(str::to_string).collect())
    }

    pub fn defaults() -> Self {
        Self(DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path form sent to the expansion service.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl<'de> Deserialize<'de> for SeedList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        SeedList::new(raw).map_err(serde::de::Error::custom)
    }
}

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($variant,)+
            /// The service's fallback, sent when no tag was given.
            #[default]
            Default,
            /// Any other tag, forwarded verbatim.
            Other(String),
        }

        impl $name {
            /// Blank input selects `Default`; known tags match case-insensitively.
            pub fn parse(raw: &str) -> Self {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default") {
                    return $name::Default;
                }
                $(
                    if trimmed.eq_ignore_ascii_case($tag) {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Default => "default",
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok($name::parse(&raw))
            }
        }
    };
}

tag_enum! {
    /// Algorithm the expansion service uses to grow the network from the seeds.
    ExpansionMethod {
        PageRank => "PageRank",
        Subgraph => "Subgraph",
    }
}

tag_enum! {
    /// Source interaction dataset queried by the expansion service.
    Interactome {
        String => "string",
    }
}

impl Interactome {
    pub fn display_name(&self) -> &str {
        match self {
            Interactome::String => "STRINGdb physical",
            other => other.as_str(),
        }
    }
}

/// Everything the expansion service needs for one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecipe {
    pub seeds: SeedList,
    pub expansion_method: ExpansionMethod,
    pub interactome: Interactome,
}

impl NetworkRecipe {
    pub fn new(seeds: SeedList, expansion_method: ExpansionMethod, interactome: Interactome) -> Self {
        Self { seeds, expansion_method, interactome }
    }

    /// Path segments after `return_network`.
    pub fn path_segments(&self) -> [String; 3] {
        [
            self.seeds.joined(),
            self.expansion_method.as_str().to_string(),
            self.interactome.as_str().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_input_uppercases_and_trims() {
        let seeds = SeedList::parse_input("  pln ,  sln,atp2a2 ");
        assert_eq!(seeds.as_slice(), &["PLN", "SLN", "ATP2A2"]);
        assert!(seeds.contains("SLN"));
    }

    #[test]
    fn test_parse_input_blank_uses_defaults() {
        assert_eq!(SeedList::parse_input("   "), SeedList::defaults());
        assert_eq!(SeedList::parse_input(" , ,"), SeedList::defaults());
    }

    #[test]
    fn test_from_query_keeps_case_and_rejects_empty() {
        let seeds = SeedList::from_query("Tp53,egfr").unwrap();
        assert_eq!(seeds.joined(), "Tp53,egfr");
        assert!(matches!(SeedList::from_query(""), Err(ProteomyxError::InvalidRequest(_))));
        assert!(SeedList::from_query(",,").is_err());
    }

    #[test]
    fn test_method_tags() {
        assert_eq!(ExpansionMethod::parse("PageRank"), ExpansionMethod::PageRank);
        assert_eq!(ExpansionMethod::parse("subgraph"), ExpansionMethod::Subgraph);
        assert_eq!(ExpansionMethod::parse(""), ExpansionMethod::Default);
        assert_eq!(ExpansionMethod::Default.as_str(), "default");
        assert_eq!(ExpansionMethod::parse("RWR").as_str(), "RWR");
    }

    #[test]
    fn test_interactome_tags() {
        assert_eq!(Interactome::parse("string"), Interactome::String);
        assert_eq!(Interactome::String.display_name(), "STRINGdb physical");
        assert_eq!(Interactome::parse("  "), Interactome::Default);
    }

    #[test]
    fn test_recipe_serde() {
        let recipe = NetworkRecipe::new(
            SeedList::parse_input("pln"),
            ExpansionMethod::Subgraph,
            Interactome::String,
        );
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "seeds": ["PLN"], "expansion_method": "Subgraph", "interactome": "string" })
        );
        let back: NetworkRecipe = serde_json::from_value(value).unwrap();
        assert_eq!(back, recipe);
        assert_eq!(back.path_segments(), ["PLN".to_string(), "Subgraph".into(), "string".into()]);
    }

    #[test]
    fn test_empty_seed_list_does_not_deserialize() {
        let result: Result<SeedList, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
