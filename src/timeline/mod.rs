//! Keyword timelines for background footage lookup.
//!
//! - `query` asks the model for `[[start, end], [keywords]]` segments covering
//!   the caption track, repairing and retrying unreliable replies.
//! - `merge` stitches per-segment video assignments back together once
//!   footage has been matched.

mod merge;
mod models;
pub mod query;
pub mod repair;

pub use merge::merge_empty_intervals;
pub use models::{Interval, KeywordSegment, TimedCaption, VideoSegment};
pub use query::{check_coverage, render_captions, CoverageMiss, QueryTimelineGenerator, TimelineState};
