use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::ProteomyxError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client that only talks to approved hosts.
/// The expansion service host is the only entry by default; deployments add
/// more through `expansion.extra_allowed_hosts`.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with an empty allowlist and the default 30 s timeout.
    pub fn new() -> Result<Self, ProteomyxError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProteomyxError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("proteomyx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProteomyxError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist: HashSet::new() })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_ascii_lowercase());
    }

    /// Allows the host of `url`. Fails when the URL has no host.
    pub fn allow_url_host(&mut self, url: &Url) -> Result<(), ProteomyxError> {
        let host = url.host_str().ok_or_else(|| {
            ProteomyxError::Config(format!("URL has no host: {}", url))
        })?;
        self.allow_domain(host);
        Ok(())
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        // Exact match or a subdomain of an allowed host
        self.allowlist
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Builds a GET request, refusing hosts outside the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, ProteomyxError> {
        if !self.is_allowed(url) {
            return Err(ProteomyxError::SecurityError(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
