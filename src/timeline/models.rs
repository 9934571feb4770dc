//! Data models for timed captions and keyword timelines.
//!
//! Every type serializes as the positional JSON arrays the models speak,
//! e.g. `[[0, 2.5], ["cat sleeping"]]`.

use serde::{Deserialize, Serialize};

/// A `[start, end]` window in seconds from the start of the video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl From<[f64; 2]> for Interval {
    fn from([start, end]: [f64; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Interval> for [f64; 2] {
    fn from(interval: Interval) -> Self {
        [interval.start, interval.end]
    }
}

/// A caption line and the window it is displayed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Interval, String)", into = "(Interval, String)")]
pub struct TimedCaption {
    pub interval: Interval,
    pub text: String,
}

impl TimedCaption {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            interval: Interval::new(start, end),
            text: text.into(),
        }
    }
}

impl From<(Interval, String)> for TimedCaption {
    fn from((interval, text): (Interval, String)) -> Self {
        Self { interval, text }
    }
}

impl From<TimedCaption> for (Interval, String) {
    fn from(caption: TimedCaption) -> Self {
        (caption.interval, caption.text)
    }
}

/// A time window tagged with stock-footage search terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Interval, Vec<String>)", into = "(Interval, Vec<String>)")]
pub struct KeywordSegment {
    pub interval: Interval,
    pub keywords: Vec<String>,
}

impl KeywordSegment {
    pub fn new<I, S>(start: f64, end: f64, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interval: Interval::new(start, end),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// At least one keyword with visible text.
    pub fn has_keywords(&self) -> bool {
        self.keywords.iter().any(|k| !k.trim().is_empty())
    }
}

impl From<(Interval, Vec<String>)> for KeywordSegment {
    fn from((interval, keywords): (Interval, Vec<String>)) -> Self {
        Self { interval, keywords }
    }
}

impl From<KeywordSegment> for (Interval, Vec<String>) {
    fn from(segment: KeywordSegment) -> Self {
        (segment.interval, segment.keywords)
    }
}

/// A window with an assigned video, or `None` while unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Interval, Option<String>)", into = "(Interval, Option<String>)")]
pub struct VideoSegment {
    pub interval: Interval,
    pub url: Option<String>,
}

impl VideoSegment {
    pub fn new(start: f64, end: f64, url: Option<&str>) -> Self {
        Self {
            interval: Interval::new(start, end),
            url: url.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none()
    }
}

impl From<(Interval, Option<String>)> for VideoSegment {
    fn from((interval, url): (Interval, Option<String>)) -> Self {
        Self { interval, url }
    }
}

impl From<VideoSegment> for (Interval, Option<String>) {
    fn from(segment: VideoSegment) -> Self {
        (segment.interval, segment.url)
    }
}
