//! Timeline command implementation.

use super::{emit, read_json};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::completion::create_service;
use crate::config::{Prompts, Settings};
use crate::response_log;
use crate::timeline::{QueryTimelineGenerator, TimedCaption};
use anyhow::{Context, Result};

/// Run the timeline command.
pub async fn run_timeline(
    script_path: &str,
    captions_path: &str,
    output: Option<String>,
    max_attempts: Option<u32>,
    mut settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Timeline, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read {}", script_path))?;
    let captions: Vec<TimedCaption> = read_json(captions_path)?;
    if let Some(n) = max_attempts {
        settings.timeline.max_attempts = n;
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let completion = create_service(settings.timeline.provider, &settings.timeline.model, &settings)?;
    let generator = QueryTimelineGenerator::with_settings(completion, &settings.timeline)
        .with_prompts(prompts)
        .with_response_log(response_log::from_settings(&settings));

    let spinner = Output::spinner(&format!(
        "Extracting keywords for {} captions with {}...",
        captions.len(),
        settings.timeline.model
    ));

    let result = generator.try_query_timeline(script.trim(), &captions).await;
    spinner.finish_and_clear();

    match result {
        Ok(timeline) => {
            Output::header("Keyword timeline");
            for segment in &timeline {
                Output::keyword_segment(segment);
            }
            emit(&serde_json::to_string_pretty(&timeline)?, output.as_deref())
        }
        Err(e) => {
            Output::error(&format!("No usable timeline: {}", e));
            Err(e.into())
        }
    }
}
