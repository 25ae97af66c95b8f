use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::client::{TextGenerator, http_client, truncate_body};
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-1.5-flash";

/// Google Gemini REST client, fixed to the flash model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: http_client(timeout)?,
        })
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url);
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let res = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                Error::ModelUnavailable(format!("failed to send request to Gemini: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            Error::ModelUnavailable(format!("failed to read Gemini response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(Error::ModelUnavailable(format!(
                "Gemini request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            Error::ModelUnavailable(format!(
                "failed to parse Gemini JSON: {e}; body: {}",
                truncate_body(&body),
            ))
        })?;

        let reply = parsed.first_text();
        if reply.is_empty() {
            return Err(Error::ModelUnavailable("Gemini returned no text".to_string()));
        }

        debug!(chars = reply.chars().count(), "model reply received");
        Ok(reply)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The concatenated text of the first candidate; empty when the model
    /// returned nothing usable (no candidates, safety-blocked content).
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content.parts.into_iter().filter_map(|part| part.text).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default()
    }
}
