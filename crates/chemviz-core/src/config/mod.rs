//! Configuration loading for chemviz.
//! Reads TOML from config/default.toml or the path in CHEMVIZ_CONFIG; a
//! missing file boots on defaults so the pipeline runs without any setup.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub toolkit: ToolkitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    /// Environment variable holding the API key. The key itself never
    /// appears in configuration files or logs.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_oracle_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_oracle_model()    -> String { "gpt-4o-mini".to_string() }
fn default_api_key_env()     -> String { "OPENAI_API_KEY".to_string() }
fn default_timeout_secs()    -> u64 { 30 }

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            base_url: default_oracle_base_url(),
            model: default_oracle_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OracleConfig {
    /// Credential from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_lookup_base_url() -> String {
    "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_string()
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            base_url: default_lookup_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default = "default_embed_seed")]
    pub embed_seed: u64,
    #[serde(default = "default_max_opt_iterations")]
    pub max_opt_iterations: usize,
}

fn default_embed_seed()         -> u64 { 42 }
fn default_max_opt_iterations() -> usize { 200 }

impl Default for ToolkitConfig {
    fn default() -> Self {
        ToolkitConfig {
            embed_seed: default_embed_seed(),
            max_opt_iterations: default_max_opt_iterations(),
        }
    }
}

impl Config {
    /// Load configuration, checking CHEMVIZ_CONFIG first, then
    /// config/default.toml.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CHEMVIZ_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load_from(&path)
    }

    /// Load from an explicit path; a missing file yields the defaults.
    pub fn load_from(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|err| CoreError::Config(format!("failed to parse {path}: {err}"))),
            Err(_) => {
                debug!("no config file at {path}, using defaults");
                Ok(Config::default())
            }
        }
    }
}
