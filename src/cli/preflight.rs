//! Pre-flight checks before model calls.
//!
//! Validates that the selected backend is usable before reading inputs and
//! starting requests that would otherwise fail midway.

use crate::config::{CompletionProvider, Settings};
use crate::error::{Result, ShortsmithError};
use crate::openai::api_key;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Script generation uses the `[script]` provider.
    Script,
    /// Timeline extraction uses the `[timeline]` provider.
    Timeline,
    /// Merging is local and needs nothing.
    Merge,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    let provider = match operation {
        Operation::Script => settings.script.provider,
        Operation::Timeline => settings.timeline.provider,
        Operation::Merge => return Ok(()),
    };

    match provider {
        CompletionProvider::OpenAI => api_key(&settings.openai).map(|_| ()),
        CompletionProvider::Ollama => check_host(&settings.ollama.host),
    }
}

fn check_host(host: &str) -> Result<()> {
    if host.starts_with("http://") || host.starts_with("https://") {
        Ok(())
    } else {
        Err(ShortsmithError::Config(format!(
            "Ollama host must be an http(s) URL, got '{}'",
            host
        )))
    }
}
