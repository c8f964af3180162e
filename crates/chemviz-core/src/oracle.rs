//! Structure oracle: free text in, best-guess chemical record out.
//!
//! The production implementation talks to an OpenAI-style chat-completions
//! endpoint. The response is never trusted: callers extract a length-capped
//! JSON span and deserialize it into [`OracleRecord`], treating any failure
//! as a recoverable stage miss.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::error::{CoreError, Result};

/// Longest response prefix scanned for an embedded JSON object.
pub const MAX_EXTRACT_LEN: usize = 16 * 1024;

const ORACLE_PROMPT: &str = r#"You are a chemistry assistant. Identify the compound described by the input and answer with ONLY a JSON object, no prose before or after, using exactly these keys: "smiles", "iupac_name", "common_name", "molecular_formula", "description", "pubchem_cid". Use null for any value you do not know. "pubchem_cid" must be a number or null. "description" is one or two sentences about the compound. If the input does not describe a chemical compound, set every key except "description" to null and explain in "description".

Example answer for the input "aspirin":
{"smiles": "CC(=O)Oc1ccccc1C(=O)O", "iupac_name": "2-acetyloxybenzoic acid", "common_name": "aspirin", "molecular_formula": "C9H8O4", "description": "A widely used analgesic and anti-inflammatory drug.", "pubchem_cid": 2244}"#;

fn build_prompt(text: &str) -> String {
    format!("{ORACLE_PROMPT}\n\nInput: {text}")
}

// ── Response handling ──────────────────────────────────────────────────────

/// Untrusted record shape the oracle is asked to produce.
/// Missing keys, nulls, and extra keys all deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OracleRecord {
    pub smiles: Option<String>,
    pub iupac_name: Option<String>,
    pub common_name: Option<String>,
    pub molecular_formula: Option<String>,
    pub description: Option<String>,
    pub pubchem_cid: Option<u64>,
}

/// First-`{`-to-last-`}` span of the scanned prefix.
///
/// Tolerates code fences and surrounding prose. Objects that start beyond
/// [`MAX_EXTRACT_LEN`] are rejected rather than scanned.
pub fn extract_json_object(raw: &str) -> Result<&str> {
    let mut end = MAX_EXTRACT_LEN.min(raw.len());
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    let scanned = &raw[..end];

    let open = scanned
        .find('{')
        .ok_or_else(|| CoreError::MalformedOracleResponse("no JSON object in response".into()))?;
    let close = scanned
        .rfind('}')
        .filter(|&close| close > open)
        .ok_or_else(|| {
            CoreError::MalformedOracleResponse("unterminated JSON object in response".into())
        })?;
    Ok(&scanned[open..=close])
}

/// Extract and deserialize the oracle's JSON answer.
pub fn parse_oracle_record(raw: &str) -> Result<OracleRecord> {
    let span = extract_json_object(raw)?;
    serde_json::from_str(span).map_err(|err| CoreError::MalformedOracleResponse(err.to_string()))
}

// ── Trait ──────────────────────────────────────────────────────────────────

/// Free-text chemical identification.
#[async_trait]
pub trait StructureOracle: Send + Sync {
    /// Raw model response for the given input text.
    async fn query(&self, text: &str) -> Result<String>;
}

// ── OpenAI-style production implementation ─────────────────────────────────

pub struct OpenAiOracle {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiOracle {
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(OpenAiOracle {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    /// Build the production oracle from configuration.
    ///
    /// Returns `Ok(None)` when the credential environment variable is unset;
    /// resolution then runs on database lookup and direct parsing alone.
    pub fn from_config(config: &OracleConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            warn!(
                "{} is not set; structure oracle disabled, falling back to database lookup and direct parsing",
                config.api_key_env
            );
            return Ok(None);
        };
        let oracle = Self::new(
            api_key,
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Some(oracle))
    }
}

#[async_trait]
impl StructureOracle for OpenAiOracle {
    async fn query(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": build_prompt(text)}],
            "temperature": 0,
        });

        debug!(model = %self.model, "querying structure oracle");
        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| CoreError::OracleUnavailable(err.to_string()))?;
        let resp = check_response_status(resp).await?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|err| CoreError::OracleUnavailable(err.to_string()))?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(content)
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    let message = body["error"]["message"]
        .as_str()
        .or_else(|| body["message"].as_str())
        .unwrap_or("unknown error")
        .to_string();
    Err(CoreError::OracleUnavailable(format!(
        "[{}] {}",
        status.as_u16(),
        message
    )))
}

// ── Mock implementation for testing ────────────────────────────────────────

/// Scripted oracle for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    response: Option<String>,
    offline: bool,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every query with this text.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Fail every query as if the endpoint were unreachable.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

#[async_trait]
impl StructureOracle for MockOracle {
    async fn query(&self, _text: &str) -> Result<String> {
        if self.offline {
            return Err(CoreError::OracleUnavailable("mock oracle offline".into()));
        }
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(CoreError::OracleUnavailable(
                "mock oracle has no scripted response".into(),
            )),
        }
    }
}
