//! OpenAI-compatible client configuration.
//!
//! The hosted provider defaults to OpenRouter, which speaks the OpenAI chat
//! API; any compatible base URL works.

use crate::config::OpenAISettings;
use crate::error::{Result, ShortsmithError};
use async_openai::{config::OpenAIConfig, Client};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Read the API key from the environment variable named in settings.
pub fn api_key(settings: &OpenAISettings) -> Result<String> {
    match std::env::var(&settings.api_key_env) {
        Ok(key) if !key.is_empty() => Ok(key),
        Ok(_) => Err(ShortsmithError::Config(format!(
            "{} is empty",
            settings.api_key_env
        ))),
        Err(_) => Err(ShortsmithError::Config(format!(
            "Missing API key. Set {} in your environment.",
            settings.api_key_env
        ))),
    }
}

/// Create a chat client for the configured endpoint.
pub fn create_client(settings: &OpenAISettings) -> Result<Client<OpenAIConfig>> {
    let key = api_key(settings)?;
    create_client_with_key(settings, &key)
}

/// Create a chat client with an explicit key.
pub fn create_client_with_key(settings: &OpenAISettings, key: &str) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .default_headers(attribution_headers(settings)?)
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(settings.base_url.trim_end_matches('/'))
        .with_api_key(key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// OpenRouter ranks apps by these optional headers.
fn attribution_headers(settings: &OpenAISettings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let pairs = [
        ("http-referer", settings.referer.as_deref()),
        ("x-title", settings.title.as_deref()),
    ];

    for (name, value) in pairs {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = HeaderValue::from_str(value)
            .map_err(|e| ShortsmithError::Config(format!("Invalid {} header: {}", name, e)))?;
        headers.insert(HeaderName::from_static(name), value);
    }

    Ok(headers)
}
