//! Hosted chat completion through an OpenAI-compatible API.

use super::{CompletionRequest, CompletionService};
use crate::config::OpenAISettings;
use crate::error::{Result, ShortsmithError};
use crate::openai::create_client;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat completion backend for OpenAI, OpenRouter and compatible endpoints.
pub struct OpenAICompletion {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAICompletion {
    /// Create a backend, reading the API key from the configured env var.
    pub fn new(settings: &OpenAISettings, model: &str) -> Result<Self> {
        Ok(Self::with_client(create_client(settings)?, model))
    }

    pub fn with_client(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn build_messages(request: &CompletionRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(|e| ShortsmithError::fatal(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.clone())
                .build()
                .map_err(|e| ShortsmithError::fatal(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }
}

/// API error types and codes that signal rate limiting or a server-side fault.
const RETRYABLE_API_ERRORS: &[&str] = &[
    "rate_limit_exceeded",
    "server_error",
    "overloaded_error",
    "service_unavailable",
    "timeout",
    "429",
    "500",
    "502",
    "503",
    "504",
];

/// async-openai retries rate limits internally. Server faults and rate limits
/// that outlast its backoff surface as `ApiError` and are sorted by `type`/`code`.
fn is_retryable_api_error(error: &ApiError) -> bool {
    [error.r#type.as_deref(), error.code.as_deref()]
        .into_iter()
        .flatten()
        .any(|tag| RETRYABLE_API_ERRORS.contains(&tag))
}

/// Network hiccups, rate limits, server faults and garbled gateway bodies
/// are worth another try.
fn classify(error: OpenAIError) -> ShortsmithError {
    match error {
        OpenAIError::Reqwest(e) if e.is_timeout() || e.is_connect() => {
            ShortsmithError::transient(format!("Chat request failed: {}", e))
        }
        OpenAIError::Reqwest(e)
            if e.status()
                .is_some_and(|s| s.as_u16() == 429 || s.is_server_error()) =>
        {
            ShortsmithError::transient(format!("Chat request failed: {}", e))
        }
        OpenAIError::ApiError(e) if is_retryable_api_error(&e) => {
            ShortsmithError::transient(format!("Chat API error: {}", e))
        }
        OpenAIError::JSONDeserialize(e) => {
            ShortsmithError::transient(format!("Unreadable chat response: {}", e))
        }
        other => ShortsmithError::OpenAI(other.to_string()),
    }
}

#[async_trait]
impl CompletionService for OpenAICompletion {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(Self::build_messages(request)?)
            .n(1);

        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }

        let chat_request = builder
            .build()
            .map_err(|e| ShortsmithError::fatal(e.to_string()))?;

        let response = self.client.chat().create(chat_request).await.map_err(classify)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ShortsmithError::transient("Empty response from model"))?;

        debug!("Chat reply: {} chars", content.len());
        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
