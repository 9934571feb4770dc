//! Text completion backends.
//!
//! Every generator talks to the model through [`CompletionService`], so the
//! same orchestration runs against a hosted chat API or a local model.

mod ollama;
mod openai;

pub use ollama::OllamaCompletion;
pub use openai::OpenAICompletion;

use crate::config::{CompletionProvider, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A single completion request. One candidate is always requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    /// Optional system instruction (chat-style backends).
    pub system: Option<String>,
    /// The user prompt.
    pub prompt: String,
    pub temperature: Option<f32>,
    /// Maximum output length in tokens.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Trait for text completion services.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Submit a request and return the model's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Build the backend selected for a component.
pub fn create_service(
    provider: CompletionProvider,
    model: &str,
    settings: &Settings,
) -> Result<Arc<dyn CompletionService>> {
    let service: Arc<dyn CompletionService> = match provider {
        CompletionProvider::OpenAI => Arc::new(OpenAICompletion::new(&settings.openai, model)?),
        CompletionProvider::Ollama => Arc::new(OllamaCompletion::new(&settings.ollama, model)?),
    };
    Ok(service)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted completion service for tests.

    use super::{CompletionRequest, CompletionService};
    use crate::error::{Result, ShortsmithError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued replies in order; the last one repeats once the queue drains.
    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<Result<String>>>,
        last: Mutex<Option<String>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedCompletion {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self::with_results(replies.into_iter().map(|r| Ok(r.into())))
        }

        pub fn with_results(replies: impl IntoIterator<Item = Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                last: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());

            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(reply)) => {
                    *self.last.lock().unwrap() = Some(reply.clone());
                    Ok(reply)
                }
                Some(Err(e)) => Err(e),
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .ok_or_else(|| ShortsmithError::fatal("no scripted reply")),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OllamaSettings;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("topic")
            .with_system("be brief")
            .with_temperature(0.5)
            .with_max_tokens(100);

        assert_eq!(request.prompt, "topic");
        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.temperature, Some(0.5));
        assert_eq!(request.max_tokens, Some(100));
    }

    #[test]
    fn test_create_local_service() {
        let mut settings = Settings::default();
        settings.ollama = OllamaSettings {
            host: "http://127.0.0.1:11434/".to_string(),
            timeout_secs: 5,
        };

        let service = create_service(CompletionProvider::Ollama, "mistral", &settings).unwrap();
        assert_eq!(service.model(), "mistral");
    }
}
