//! Compound lookup against a reference database.
//!
//! The production implementation queries the PubChem PUG REST service by
//! compound name. The name travels form-encoded in a POST body, so spaces
//! and unicode need no path escaping.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::LookupConfig;
use crate::error::{CoreError, Result};

/// One database match for a compound name.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundHit {
    pub smiles: String,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<f64>,
    pub cid: Option<u64>,
}

/// Name-to-structure lookup.
#[async_trait]
pub trait CompoundLookup: Send + Sync {
    /// Best match for a compound name, or `CompoundNotFound`.
    async fn lookup_by_name(&self, name: &str) -> Result<CompoundHit>;
}

// ── PubChem production implementation ──────────────────────────────────────

pub struct PubChemLookup {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PropertyTableResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties")]
    properties: Vec<CompoundProperties>,
}

#[derive(Debug, Deserialize)]
struct CompoundProperties {
    #[serde(rename = "CID")]
    cid: Option<u64>,
    #[serde(rename = "CanonicalSMILES")]
    canonical_smiles: Option<String>,
    #[serde(rename = "MolecularFormula")]
    molecular_formula: Option<String>,
    // PubChem serializes the weight as a string.
    #[serde(rename = "MolecularWeight")]
    molecular_weight: Option<String>,
}

impl PubChemLookup {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(PubChemLookup {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl CompoundLookup for PubChemLookup {
    async fn lookup_by_name(&self, name: &str) -> Result<CompoundHit> {
        let url = format!(
            "{}/compound/name/property/CanonicalSMILES,MolecularFormula,MolecularWeight/JSON",
            self.base_url.trim_end_matches('/')
        );
        let resp = self.client.post(&url).form(&[("name", name)]).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::CompoundNotFound(name.to_string()));
        }
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = body["Fault"]["Message"]
                .as_str()
                .or_else(|| body["Fault"]["Code"].as_str())
                .unwrap_or("unknown PubChem error")
                .to_string();
            return Err(CoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PropertyTableResponse = resp.json().await?;
        let first = body
            .property_table
            .properties
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::CompoundNotFound(name.to_string()))?;
        let smiles = first
            .canonical_smiles
            .ok_or_else(|| CoreError::CompoundNotFound(name.to_string()))?;

        debug!("pubchem matched {name:?} to cid {:?}", first.cid);
        Ok(CompoundHit {
            smiles,
            molecular_formula: first.molecular_formula,
            molecular_weight: first.molecular_weight.and_then(|w| w.parse().ok()),
            cid: first.cid,
        })
    }
}

// ── Mock implementation for testing ────────────────────────────────────────

/// In-memory lookup keyed by lowercased name.
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    compounds: HashMap<String, CompoundHit>,
    offline: bool,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compound(mut self, name: &str, hit: CompoundHit) -> Self {
        self.compounds.insert(name.to_lowercase(), hit);
        self
    }

    /// Fail every lookup as if the service were unreachable.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

#[async_trait]
impl CompoundLookup for MockLookup {
    async fn lookup_by_name(&self, name: &str) -> Result<CompoundHit> {
        if self.offline {
            return Err(CoreError::Api {
                status: 503,
                message: "mock lookup offline".into(),
            });
        }
        self.compounds
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| CoreError::CompoundNotFound(name.to_string()))
    }
}
