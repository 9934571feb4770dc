//! Raw model response logging for offline debugging.
//!
//! Entries are fire-and-forget: a sink never reports failure to its caller.

use crate::config::Settings;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Kind of model call being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    /// Keyword extraction responses.
    Gpt,
    /// Script generation responses.
    Script,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Gpt => "gpt",
            LogCategory::Script => "script",
        }
    }
}

/// Destination for raw model responses.
pub trait ResponseSink: Send + Sync {
    fn log(&self, category: LogCategory, request: &str, response: &str);
}

/// Discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopResponseLog;

impl ResponseSink for NoopResponseLog {
    fn log(&self, _category: LogCategory, _request: &str, _response: &str) {}
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    category: LogCategory,
    timestamp: DateTime<Local>,
    request: &'a str,
    response: &'a str,
}

/// Writes one JSON file per entry under `<root>/<category>_logs/`.
#[derive(Debug, Clone)]
pub struct FileResponseLog {
    root: PathBuf,
}

impl FileResponseLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding entries of one category.
    pub fn category_dir(&self, category: LogCategory) -> PathBuf {
        self.root.join(format!("{}_logs", category.as_str()))
    }

    fn write(&self, category: LogCategory, request: &str, response: &str) -> std::io::Result<PathBuf> {
        let dir = self.category_dir(category);
        std::fs::create_dir_all(&dir)?;

        let entry = LogEntry {
            category,
            timestamp: Local::now(),
            request,
            response,
        };
        let content = serde_json::to_string_pretty(&entry)?;
        let (path, mut file) = create_unique(&dir, &entry.timestamp)?;
        file.write_all(content.as_bytes())?;
        Ok(path)
    }
}

impl ResponseSink for FileResponseLog {
    fn log(&self, category: LogCategory, request: &str, response: &str) {
        match self.write(category, request, response) {
            Ok(path) => debug!("Logged {} response to {}", category.as_str(), path.display()),
            Err(e) => warn!("Failed to log {} response: {}", category.as_str(), e),
        }
    }
}

/// Sink selected by `[general]` settings.
pub fn from_settings(settings: &Settings) -> Arc<dyn ResponseSink> {
    if settings.general.log_responses {
        Arc::new(FileResponseLog::new(settings.log_dir()))
    } else {
        Arc::new(NoopResponseLog)
    }
}

/// Create a new file named by the microsecond timestamp, suffixed when
/// another entry already claimed that name.
fn create_unique(dir: &Path, timestamp: &DateTime<Local>) -> std::io::Result<(PathBuf, File)> {
    let stem = timestamp.format("%Y%m%d_%H%M%S_%6f").to_string();
    let mut path = dir.join(format!("{}.json", stem));
    let mut n = 1;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                path = dir.join(format!("{}_{}.json", stem, n));
                n += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
