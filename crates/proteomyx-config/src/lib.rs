//! Configuration loading for Proteomyx.
//! Reads proteomyx.toml from the current directory or the path in PROTEOMYX_CONFIG,
//! then applies environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const CONFIG_PATH_VAR: &str = "PROTEOMYX_CONFIG";
pub const ENVIRONMENT_VAR: &str = "PROTEOMYX_ENV";
pub const EXPANSION_URL_VAR: &str = "PROTEOMYX_EXPANSION_URL";
pub const PORT_VAR: &str = "PROTEOMYX_PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Deployment environment. Selects the default expansion service host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }

    /// Base URL of the expansion service when none is configured.
    pub fn default_expansion_base(&self) -> &'static str {
        match self {
            // Internal Docker network hostname
            Environment::Production => "http://nginx:80",
            Environment::Development => "http://localhost:80",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Overrides the environment's default host when set.
    pub base_url: Option<String>,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub extra_allowed_hosts: Vec<String>,
}

fn default_api_path()     -> String { "/flaskapi/api".to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_path: default_api_path(),
            timeout_secs: default_timeout_secs(),
            extra_allowed_hosts: Vec::new(),
        }
    }
}

impl ExpansionConfig {
    /// Full service root: base URL plus API path, without a trailing slash.
    pub fn service_url(&self, environment: Environment) -> Result<Url, ConfigError> {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| environment.default_expansion_base());
        let path = self.api_path.trim_matches('/');
        let joined = if path.is_empty() {
            base.trim_end_matches('/').to_string()
        } else {
            format!("{}/{}", base.trim_end_matches('/'), path)
        };

        let url = Url::parse(&joined)
            .map_err(|e| ConfigError::Invalid(format!("expansion URL {joined:?}: {e}")))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::Invalid(format!("expansion URL {joined:?} has no host")));
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Sessions untouched for this long are closed.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_expansion_method")]
    pub default_expansion_method: String,
    #[serde(default = "default_interactome")]
    pub default_interactome: String,
}

fn default_max_sessions()      -> usize  { 1024 }
fn default_idle_ttl_secs()     -> u64    { 1800 }
fn default_expansion_method()  -> String { "PageRank".to_string() }
fn default_interactome()       -> String { "string".to_string() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_ttl_secs: default_idle_ttl_secs(),
            default_expansion_method: default_expansion_method(),
            default_interactome: default_interactome(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "proteomyx=debug,info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

#[cfg(test)]
mod tests;

impl Config {
    /// Load configuration from proteomyx.toml.
    /// Checks PROTEOMYX_CONFIG first, then the current directory. A missing
    /// file falls back to built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .unwrap_or_else(|_| "proteomyx.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
            info!(path = %path, "Loaded configuration file");
            Self::from_toml_str(&content)?
        } else {
            warn!(path = %path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies PROTEOMYX_* overrides from `lookup` (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup(ENVIRONMENT_VAR) {
            match Environment::parse(&env) {
                Some(parsed) => self.environment = parsed,
                None => warn!(value = %env, "Unknown {ENVIRONMENT_VAR}, keeping {:?}", self.environment),
            }
        }
        if let Some(url) = lookup(EXPANSION_URL_VAR).filter(|u| !u.trim().is_empty()) {
            self.expansion.base_url = Some(url);
        }
        if let Some(port) = lookup(PORT_VAR) {
            match port.trim().parse() {
                Ok(p) => self.server.port = p,
                Err(e) => warn!(value = %port, "Invalid {PORT_VAR}: {e}"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.expansion.timeout_secs == 0 {
            return Err(ConfigError::Invalid("expansion.timeout_secs must be non-zero".into()));
        }
        if self.session.max_sessions == 0 {
            return Err(ConfigError::Invalid("session.max_sessions must be non-zero".into()));
        }
        if self.session.idle_ttl_secs == 0 {
            return Err(ConfigError::Invalid("session.idle_ttl_secs must be non-zero".into()));
        }
        self.expansion.service_url(self.environment)?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
