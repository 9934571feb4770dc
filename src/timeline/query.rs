//! Keyword timeline extraction.
//!
//! The model is re-queried until its timeline reaches the final caption's
//! end time or the attempt budget runs out:
//!
//! ```text
//! Pending(1) -> Pending(2) -> ... -> Accepted(timeline)
//!                                 \-> Exhausted
//! ```

use super::repair::{collapse_whitespace, parse_timeline};
use super::{KeywordSegment, TimedCaption};
use crate::completion::{CompletionRequest, CompletionService};
use crate::config::{MalformedPolicy, Prompts, TimelineSettings};
use crate::error::{Result, ShortsmithError};
use crate::response_log::{LogCategory, NoopResponseLog, ResponseSink};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Where the retry loop stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineState {
    /// About to make this (1-based) attempt.
    Pending { attempt: u32 },
    Accepted(Vec<KeywordSegment>),
    Exhausted { attempts: u32 },
}

/// Why a parsed timeline was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageMiss {
    Empty,
    EndMismatch { found: f64, expected: f64 },
    NotFromZero { start: f64 },
    Discontinuous { index: usize },
    NoKeywords { index: usize },
}

impl fmt::Display for CoverageMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageMiss::Empty => write!(f, "timeline is empty"),
            CoverageMiss::EndMismatch { found, expected } => {
                write!(f, "timeline ends at {} instead of {}", found, expected)
            }
            CoverageMiss::NotFromZero { start } => write!(f, "timeline starts at {}", start),
            CoverageMiss::Discontinuous { index } => {
                write!(f, "segment {} does not start where the previous one ends", index)
            }
            CoverageMiss::NoKeywords { index } => write!(f, "segment {} has no keywords", index),
        }
    }
}

/// Check a timeline against the caption track's end time.
///
/// Only the final end time is compared unless `require_contiguous` is set.
pub fn check_coverage(
    timeline: &[KeywordSegment],
    end: f64,
    require_contiguous: bool,
) -> std::result::Result<(), CoverageMiss> {
    let last = timeline.last().ok_or(CoverageMiss::Empty)?;
    if last.interval.end != end {
        return Err(CoverageMiss::EndMismatch {
            found: last.interval.end,
            expected: end,
        });
    }

    if require_contiguous {
        if timeline[0].interval.start != 0.0 {
            return Err(CoverageMiss::NotFromZero {
                start: timeline[0].interval.start,
            });
        }
        for (index, pair) in timeline.windows(2).enumerate() {
            if pair[1].interval.start != pair[0].interval.end {
                return Err(CoverageMiss::Discontinuous { index: index + 1 });
            }
        }
        if let Some(index) = timeline.iter().position(|s| !s.has_keywords()) {
            return Err(CoverageMiss::NoKeywords { index });
        }
    }

    Ok(())
}

/// Render captions the way they are embedded in the user message.
pub fn render_captions(captions: &[TimedCaption]) -> Result<String> {
    Ok(serde_json::to_string(captions)?)
}

/// Derives time-aligned search keywords from a script and its captions.
pub struct QueryTimelineGenerator {
    completion: Arc<dyn CompletionService>,
    prompts: Prompts,
    sink: Arc<dyn ResponseSink>,
    temperature: f32,
    max_attempts: u32,
    on_malformed: MalformedPolicy,
    require_contiguous: bool,
}

impl QueryTimelineGenerator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self::with_settings(completion, &TimelineSettings::default())
    }

    pub fn with_settings(completion: Arc<dyn CompletionService>, settings: &TimelineSettings) -> Self {
        Self {
            completion,
            prompts: Prompts::default(),
            sink: Arc::new(NoopResponseLog),
            temperature: settings.temperature,
            max_attempts: settings.max_attempts.max(1),
            on_malformed: settings.on_malformed,
            require_contiguous: settings.require_contiguous,
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

    fn build_request(&self, script: &str, captions: &[TimedCaption]) -> Result<CompletionRequest> {
        let mut vars = HashMap::new();
        vars.insert("script".to_string(), script.to_string());
        vars.insert("captions".to_string(), render_captions(captions)?);

        let system = self.prompts.render_with_custom(&self.prompts.timeline.system, &vars);
        let user = self.prompts.render_with_custom(&self.prompts.timeline.user, &vars);

        Ok(CompletionRequest::new(user)
            .with_system(system)
            .with_temperature(self.temperature))
    }

    /// Keyword timeline covering the captions, or `None` when no usable
    /// timeline could be produced. The cause is logged.
    pub async fn get_query_timeline(
        &self,
        script: &str,
        captions: &[TimedCaption],
    ) -> Option<Vec<KeywordSegment>> {
        match self.try_query_timeline(script, captions).await {
            Ok(timeline) => Some(timeline),
            Err(e) => {
                error!("Error in response: {}", e);
                None
            }
        }
    }

    /// Like [`get_query_timeline`](Self::get_query_timeline), keeping the error.
    #[instrument(skip(self, script, captions), fields(caption_count = captions.len(), model = %self.completion.model()))]
    pub async fn try_query_timeline(
        &self,
        script: &str,
        captions: &[TimedCaption],
    ) -> Result<Vec<KeywordSegment>> {
        let end = target_end(captions)?;
        let request = self.build_request(script, captions)?;

        let mut state = TimelineState::Pending { attempt: 1 };
        loop {
            state = match state {
                TimelineState::Pending { attempt } if attempt > self.max_attempts => {
                    TimelineState::Exhausted {
                        attempts: self.max_attempts,
                    }
                }
                TimelineState::Pending { attempt } => {
                    self.attempt(&request, script, end, attempt).await?
                }
                TimelineState::Accepted(timeline) => {
                    info!("Accepted timeline with {} segments", timeline.len());
                    return Ok(timeline);
                }
                TimelineState::Exhausted { attempts } => {
                    warn!("Giving up after {} attempts", attempts);
                    return Err(ShortsmithError::CoverageExhausted { attempts });
                }
            };
        }
    }

    /// One query. Returns the next state, or an error that aborts the loop.
    async fn attempt(
        &self,
        request: &CompletionRequest,
        script: &str,
        end: f64,
        attempt: u32,
    ) -> Result<TimelineState> {
        debug!("Timeline attempt {}/{}", attempt, self.max_attempts);
        let retry = TimelineState::Pending { attempt: attempt + 1 };

        let reply = match self.completion.complete(request).await {
            Ok(reply) => collapse_whitespace(&reply),
            Err(e) if e.is_transient() => {
                warn!("Attempt {} failed, retrying: {}", attempt, e);
                return Ok(retry);
            }
            Err(e) => return Err(e),
        };
        self.sink.log(LogCategory::Gpt, script, &reply);

        let timeline = match parse_timeline(&reply) {
            Ok(timeline) => timeline,
            Err(e) if self.on_malformed == MalformedPolicy::Retry => {
                warn!("Attempt {} returned unparseable JSON: {}", attempt, e);
                return Ok(retry);
            }
            Err(e) => return Err(e),
        };

        match check_coverage(&timeline, end, self.require_contiguous) {
            Ok(()) => Ok(TimelineState::Accepted(timeline)),
            Err(miss) => {
                debug!("Attempt {} rejected: {}", attempt, miss);
                Ok(retry)
            }
        }
    }
}

/// End time of the final caption.
fn target_end(captions: &[TimedCaption]) -> Result<f64> {
    let last = captions
        .last()
        .ok_or_else(|| ShortsmithError::InvalidInput("no captions".to_string()))?;

    let end = last.interval.end;
    if !end.is_finite() || end <= 0.0 {
        return Err(ShortsmithError::InvalidInput(format!(
            "final caption ends at {}",
            end
        )));
    }
    Ok(end)
}
