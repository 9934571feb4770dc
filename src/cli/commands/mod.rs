//! CLI command implementations.

mod config;
mod merge;
mod script;
mod timeline;

pub use config::run_config;
pub use merge::run_merge;
pub use script::run_script;
pub use timeline::run_timeline;

use crate::cli::Output;
use anyhow::{Context, Result};

/// Print `content` to stdout, or write it to `output` when given.
fn emit(content: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
            Output::success(&format!("Wrote {}", path));
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Read a JSON input file into `T`.
fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path))
}
