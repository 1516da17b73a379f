//! Google Gemini `generateContent` backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionBackend, GatewayError};
use crate::config::GeminiConfig;

/// The key travels in a header so it never appears in a request URL, and so
/// never in an error message.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Single-shot Gemini client. Retries are the gateway's job.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiBackend {
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GatewayError::Config("GEMINI_API_KEY not set in environment variables".into()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "complete: called");
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "complete: API error");
            return Err(GatewayError::from_status(status.as_u16(), text));
        }

        let payload: GeminiResponse = response.json().await.map_err(|e| GatewayError::Permanent {
            status: Some(status.as_u16()),
            message: format!("unreadable response body: {}", e),
        })?;
        payload.into_text()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, with all of its text parts joined.
    fn into_text(self) -> Result<String, GatewayError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GatewayError::Permanent {
                status: None,
                message: "response contained no candidate text".into(),
            });
        }
        Ok(text)
    }
}
