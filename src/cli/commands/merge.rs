//! Merge command implementation.

use super::{emit, read_json};
use crate::cli::Output;
use crate::timeline::{merge_empty_intervals, VideoSegment};
use anyhow::Result;

/// Run the merge command.
pub fn run_merge(segments_path: &str, output: Option<String>) -> Result<()> {
    let segments: Vec<VideoSegment> = read_json(segments_path)?;
    let merged = merge_empty_intervals(&segments);

    Output::info(&format!("{} segments merged into {}", segments.len(), merged.len()));
    for segment in &merged {
        Output::video_segment(segment);
    }

    emit(&serde_json::to_string(&merged)?, output.as_deref())
}
