//! HTTP client for the expansion service.

use async_trait::async_trait;
use proteomyx_common::{ProteomyxError, Result, SandboxClient};
use proteomyx_config::{Environment, ExpansionConfig};
use proteomyx_graph::{Graph, NetworkRecipe};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::NetworkSource;

const NETWORK_ENDPOINT: &str = "return_network";

pub struct ExpansionClient {
    client: SandboxClient,
    service_url: Url,
}

impl ExpansionClient {
    /// `service_url` is the API root, e.g. `http://nginx/flaskapi/api`.
    pub fn new(service_url: Url, timeout: Duration) -> Result<Self> {
        if service_url.cannot_be_a_base() {
            return Err(ProteomyxError::Config(format!(
                "expansion service URL cannot be a base: {}",
                service_url
            )));
        }
        let mut client = SandboxClient::with_timeout(timeout)?;
        client.allow_url_host(&service_url)?;
        Ok(Self { client, service_url })
    }

    pub fn from_config(config: &ExpansionConfig, environment: Environment) -> Result<Self> {
        let service_url = config
            .service_url(environment)
            .map_err(|e| ProteomyxError::Config(e.to_string()))?;
        let mut this = Self::new(service_url, Duration::from_secs(config.timeout_secs))?;
        for host in &config.extra_allowed_hosts {
            this.client.allow_domain(host);
        }
        Ok(this)
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    /// `{service}/return_network/{seeds}/{method}/{interactome}/`, each segment
    /// percent-encoded.
    pub fn network_url(&self, recipe: &NetworkRecipe) -> Result<Url> {
        let mut url = self.service_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProteomyxError::Config(format!("cannot extend URL {}", self.service_url))
            })?;
            segments.pop_if_empty().push(NETWORK_ENDPOINT);
            for segment in recipe.path_segments() {
                segments.push(&segment);
            }
            // Trailing slash expected by the service
            segments.push("");
        }
        Ok(url)
    }

    /// Fetches the network as raw JSON after checking it has `nodes` and
    /// `links` arrays. Used by the proxy so the body passes through untouched.
    #[instrument(skip(self, recipe), fields(seeds = %recipe.seeds.joined(), method = %recipe.expansion_method, interactome = %recipe.interactome))]
    pub async fn fetch_raw(&self, recipe: &NetworkRecipe) -> Result<Value> {
        let url = self.network_url(recipe)?;
        debug!(url = %url, "Fetching network from expansion service");

        let resp = self.client.get(url.as_str())?.send().await.map_err(|e| {
            warn!(error = %e, "Expansion service unreachable");
            ProteomyxError::Http(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Expansion service returned an error status");
            return Err(ProteomyxError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ProteomyxError::MalformedGraph(format!("invalid JSON: {}", e)))?;
        check_graph_shape(&body)?;

        debug!(
            nodes = body["nodes"].as_array().map_or(0, Vec::len),
            links = body["links"].as_array().map_or(0, Vec::len),
            "Network received"
        );
        Ok(body)
    }
}

fn check_graph_shape(body: &Value) -> Result<()> {
    let Some(obj) = body.as_object() else {
        return Err(ProteomyxError::MalformedGraph("response is not a JSON object".into()));
    };
    for key in ["nodes", "links"] {
        if !obj.get(key).is_some_and(Value::is_array) {
            return Err(ProteomyxError::MalformedGraph(format!("missing `{}` array", key)));
        }
    }
    Ok(())
}

#[async_trait]
impl NetworkSource for ExpansionClient {
    async fn fetch_network(&self, recipe: &NetworkRecipe) -> Result<Graph> {
        let body = self.fetch_raw(recipe).await?;
        serde_json::from_value(body).map_err(|e| ProteomyxError::MalformedGraph(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proteomyx_graph::{ExpansionMethod, Interactome, SeedList};
    use serde_json::json;

    fn client() -> ExpansionClient {
        ExpansionClient::new(
            Url::parse("http://nginx:80/flaskapi/api").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_network_url_shape() {
        let recipe = NetworkRecipe::new(
            SeedList::parse_input("pln, sln"),
            ExpansionMethod::PageRank,
            Interactome::String,
        );
        assert_eq!(
            client().network_url(&recipe).unwrap().as_str(),
            "http://nginx/flaskapi/api/return_network/PLN,SLN/PageRank/string/"
        );
    }

    #[test]
    fn test_network_url_encodes_segments() {
        let recipe = NetworkRecipe::new(
            SeedList::new(vec!["A/B".into()]).unwrap(),
            ExpansionMethod::Default,
            Interactome::parse("my set"),
        );
        assert_eq!(
            client().network_url(&recipe).unwrap().as_str(),
            "http://nginx/flaskapi/api/return_network/A%2FB/default/my%20set/"
        );
    }

    #[test]
    fn test_trailing_slash_on_service_url() {
        let c = ExpansionClient::new(Url::parse("http://localhost/api/").unwrap(), Duration::from_secs(1)).unwrap();
        let recipe = NetworkRecipe::new(SeedList::defaults(), ExpansionMethod::Subgraph, Interactome::String);
        assert_eq!(
            c.network_url(&recipe).unwrap().as_str(),
            "http://localhost/api/return_network/PLN,SLN/Subgraph/string/"
        );
    }

    #[test]
    fn test_shape_check() {
        assert!(check_graph_shape(&json!({ "nodes": [], "links": [] })).is_ok());
        assert!(check_graph_shape(&json!({ "nodes": [] })).is_err());
        assert!(check_graph_shape(&json!({ "nodes": [], "links": null })).is_err());
        assert!(check_graph_shape(&json!([1, 2])).is_err());
    }
}
