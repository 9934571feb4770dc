//! CLI output formatting utilities.

use crate::timeline::{KeywordSegment, VideoSegment};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        eprintln!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        eprintln!("\n{}", style(msg).bold().underlined());
    }

    /// Print one keyword segment.
    pub fn keyword_segment(segment: &KeywordSegment) {
        eprintln!(
            "  {} {} {}",
            style("*").cyan(),
            style(format_span(segment.interval.start, segment.interval.end)).dim(),
            segment.keywords.join(", ")
        );
    }

    /// Print one video segment.
    pub fn video_segment(segment: &VideoSegment) {
        let url = match &segment.url {
            Some(url) => style(url.clone()),
            None => style("(empty)".to_string()).yellow(),
        };
        eprintln!(
            "  {} {} {}",
            style("*").cyan(),
            style(format_span(segment.interval.start, segment.interval.end)).dim(),
            url
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format a window as `[0.00s - 2.50s]`.
fn format_span(start: f64, end: f64) -> String {
    format!("[{:.2}s - {:.2}s]", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_span() {
        assert_eq!(format_span(0.0, 2.5), "[0.00s - 2.50s]");
    }
}
