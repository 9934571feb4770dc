//! Local inference through an Ollama server.

use super::{CompletionRequest, CompletionService};
use crate::config::OllamaSettings;
use crate::error::{Result, ShortsmithError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Completion backend for a locally running Ollama model.
pub struct OllamaCompletion {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaCompletion {
    pub fn new(settings: &OllamaSettings, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/generate", settings.host.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionService for OllamaCompletion {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = format!("Ollama returned {}: {}", status, detail.trim());
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                ShortsmithError::transient(message)
            } else {
                ShortsmithError::fatal(message)
            });
        }

        let body: GenerateResponse = response.json().await?;
        debug!("Local reply: {} chars", body.response.len());
        Ok(body.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
