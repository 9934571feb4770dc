//! Script command implementation.

use super::emit;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::completion::create_service;
use crate::config::{Prompts, Settings};
use crate::response_log;
use crate::script::ScriptGenerator;
use anyhow::Result;

/// Run the script command.
pub async fn run_script(topic: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Script, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let completion = create_service(settings.script.provider, &settings.script.model, &settings)?;
    let generator = ScriptGenerator::with_settings(completion, &settings.script)
        .with_prompts(prompts)
        .with_response_log(response_log::from_settings(&settings));

    let spinner = Output::spinner(&format!(
        "Writing script with {} ({})...",
        settings.script.model, settings.script.provider
    ));

    match generator.generate_script(topic).await {
        Ok(script) => {
            spinner.finish_and_clear();
            emit(&script, output.as_deref())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate script: {}", e));
            Err(e.into())
        }
    }
}
