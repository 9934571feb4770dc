//! Configuration module for Shortsmith.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, ScriptPrompts, TimelinePrompts};
pub use settings::{
    CompletionProvider, GeneralSettings, MalformedPolicy, OllamaSettings, OpenAISettings,
    PromptSettings, ScriptSettings, Settings, TimelineSettings,
};
