//! Short-form script generation.
//!
//! The model is asked for `{"script": "..."}`. Replies that do not contain a
//! readable object degrade to the raw text instead of failing.

use crate::completion::{CompletionRequest, CompletionService};
use crate::config::{Prompts, ScriptSettings};
use crate::error::{Result, ShortsmithError};
use crate::response_log::{LogCategory, NoopResponseLog, ResponseSink};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Writes a spoken script for a topic.
pub struct ScriptGenerator {
    completion: Arc<dyn CompletionService>,
    prompts: Prompts,
    sink: Arc<dyn ResponseSink>,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl ScriptGenerator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self::with_settings(completion, &ScriptSettings::default())
    }

    pub fn with_settings(completion: Arc<dyn CompletionService>, settings: &ScriptSettings) -> Self {
        Self {
            completion,
            prompts: Prompts::default(),
            sink: Arc::new(NoopResponseLog),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_response_log(mut self, sink: Arc<dyn ResponseSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Instruction, newline, topic.
    pub fn build_prompt(&self, topic: &str) -> String {
        let instruction = self
            .prompts
            .render_with_custom(&self.prompts.script.instruction, &HashMap::new());
        format!("{}\n{}", instruction, topic)
    }

    /// Generate a script for `topic` with exactly one completion call.
    ///
    /// Only the completion call itself can fail; an unreadable reply is
    /// returned verbatim.
    #[instrument(skip(self), fields(model = %self.completion.model()))]
    pub async fn generate_script(&self, topic: &str) -> Result<String> {
        let mut request = CompletionRequest::new(self.build_prompt(topic)).with_max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let content = self.completion.complete(&request).await?;
        self.sink.log(LogCategory::Script, topic, &content);

        match extract_script(&content) {
            Ok(script) => {
                info!("Generated script: {} chars", script.len());
                Ok(script)
            }
            Err(e) => {
                warn!("Error parsing script output, using raw reply: {}", e);
                Ok(content)
            }
        }
    }
}

/// Read the `script` field of the outermost `{...}` span in `content`.
pub fn extract_script(content: &str) -> Result<String> {
    let span = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if end > start => &content[start..=end],
        _ => {
            return Err(ShortsmithError::MalformedReply(
                "no JSON object in reply".to_string(),
            ))
        }
    };

    let value: serde_json::Value = serde_json::from_str(span)?;
    value
        .get("script")
        .and_then(|s| s.as_str())
        .map(str::to_string)
        .ok_or_else(|| ShortsmithError::MalformedReply("missing \"script\" field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::testing::ScriptedCompletion;
    use crate::response_log::testing::MemoryResponseLog;

    #[test]
    fn test_extract_from_noise() {
        let script = extract_script("noise {\"script\": \"hi\"} noise").unwrap();
        assert_eq!(script, "hi");
    }

    #[test]
    fn test_extract_without_braces() {
        assert!(extract_script("Bananas are berries.").is_err());
    }

    #[test]
    fn test_extract_reversed_braces() {
        assert!(extract_script("} oops {").is_err());
    }

    #[test]
    fn test_extract_missing_field() {
        assert!(extract_script(r#"{"text": "hi"}"#).is_err());
        assert!(extract_script(r#"{"script": 42}"#).is_err());
    }

    #[test]
    fn test_extract_nested_braces() {
        let reply = r#"Sure! {"script": "Octopuses have three hearts.", "meta": {"words": 4}} Enjoy"#;
        assert_eq!(extract_script(reply).unwrap(), "Octopuses have three hearts.");
    }

    #[tokio::test]
    async fn test_generate_script_parses_reply() {
        let service = Arc::new(ScriptedCompletion::new(["noise {\"script\": \"hi\"} noise"]));
        let generator = ScriptGenerator::new(service.clone());

        let script = generator.generate_script("Weird facts").await.unwrap();

        assert_eq!(script, "hi");
        assert_eq!(service.calls(), 1);
        let request = &service.requests()[0];
        assert!(request.prompt.ends_with("\nWeird facts"));
        assert_eq!(request.max_tokens, Some(500));
        assert!(request.system.is_none());
    }

    #[tokio::test]
    async fn test_generate_script_falls_back_to_raw() {
        let reply = "Here are some weird facts without any JSON.";
        let service = Arc::new(ScriptedCompletion::new([reply]));
        let log = Arc::new(MemoryResponseLog::default());
        let generator = ScriptGenerator::new(service.clone()).with_response_log(log.clone());

        let script = generator.generate_script("Weird facts").await.unwrap();

        assert_eq!(script, reply);
        assert_eq!(service.calls(), 1);
        let entries = log.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, LogCategory::Script);
    }

    #[tokio::test]
    async fn test_generate_script_propagates_service_error() {
        let service = Arc::new(ScriptedCompletion::with_results([Err(ShortsmithError::fatal(
            "model missing",
        ))]));
        let generator = ScriptGenerator::new(service);

        assert!(generator.generate_script("Space facts").await.is_err());
    }

    #[test]
    fn test_prompt_uses_custom_variables() {
        let mut prompts = Prompts::default();
        prompts.script.instruction = "Write for {{channel}}.".to_string();
        prompts.variables.insert("channel".to_string(), "Daily Facts".to_string());

        let generator =
            ScriptGenerator::new(Arc::new(ScriptedCompletion::new(["x"]))).with_prompts(prompts);
        assert_eq!(generator.build_prompt("Space facts"), "Write for Daily Facts.\nSpace facts");
    }
}
