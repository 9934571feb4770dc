//! Configuration settings for Shortsmith.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub ollama: OllamaSettings,
    pub script: ScriptSettings,
    pub timeline: TimelineSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for model response logs.
    pub log_dir: String,
    /// Write every raw model response to the log directory.
    pub log_responses: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_dir: ".logs".to_string(),
            log_responses: true,
        }
    }
}

/// Completion backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    /// Hosted OpenAI-compatible chat API (OpenRouter by default).
    #[default]
    OpenAI,
    /// Local inference through an Ollama server.
    Ollama,
}

impl std::str::FromStr for CompletionProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "openrouter" => Ok(CompletionProvider::OpenAI),
            "ollama" | "local" => Ok(CompletionProvider::Ollama),
            _ => Err(format!("Unknown completion provider: {}", s)),
        }
    }
}

impl std::fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionProvider::OpenAI => write!(f, "openai"),
            CompletionProvider::Ollama => write!(f, "ollama"),
        }
    }
}

/// Hosted chat API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// API base URL.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional HTTP-Referer attribution header.
    pub referer: Option<String>,
    /// Optional X-Title attribution header.
    pub title: Option<String>,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 300,
            referer: None,
            title: None,
        }
    }
}

/// Local Ollama server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Server address.
    pub host: String,
    /// Request timeout in seconds. Local generation can be slow.
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            timeout_secs: 600,
        }
    }
}

/// Script generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    pub provider: CompletionProvider,
    pub model: String,
    /// Maximum output length in tokens.
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            provider: CompletionProvider::Ollama,
            model: "mistral:7b-instruct-v0.2-fp16".to_string(),
            max_tokens: 500,
            temperature: None,
        }
    }
}

/// What to do with a reply that still fails to parse after repair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Spend an attempt and query again.
    #[default]
    Retry,
    /// Give up on the whole timeline.
    Abort,
}

/// Keyword timeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub provider: CompletionProvider,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on completion calls per timeline.
    pub max_attempts: u32,
    pub on_malformed: MalformedPolicy,
    /// Also require segments to start at 0, touch end to start and carry a keyword.
    pub require_contiguous: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            provider: CompletionProvider::OpenAI,
            model: "mistralai/mistral-small-3.1-24b-instruct:free".to_string(),
            temperature: 1.0,
            max_attempts: 5,
            on_malformed: MalformedPolicy::Retry,
            require_contiguous: false,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ShortsmithError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shortsmith")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded response log directory.
    pub fn log_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [timeline]
            max_attempts = 3
            on_malformed = "abort"

            [script]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(settings.timeline.max_attempts, 3);
        assert_eq!(settings.timeline.on_malformed, MalformedPolicy::Abort);
        assert!(!settings.timeline.require_contiguous);
        assert_eq!(settings.script.provider, CompletionProvider::OpenAI);
        assert_eq!(settings.script.max_tokens, 500);
        assert_eq!(settings.openai.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.timeline.model = "some/model".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.timeline.model, "some/model");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = PathBuf::from("/definitely/not/here/config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.timeline.max_attempts, 5);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenRouter".parse::<CompletionProvider>(), Ok(CompletionProvider::OpenAI));
        assert_eq!("local".parse::<CompletionProvider>(), Ok(CompletionProvider::Ollama));
        assert!("bard".parse::<CompletionProvider>().is_err());
    }
}
