//! Best-effort repair of keyword timeline replies.
//!
//! Models quote like Python, wrap answers in Markdown fences and use
//! typographic quotes. These are plain string transforms so the behavior
//! does not depend on parser error messages.

use super::KeywordSegment;
use crate::error::{Result, ShortsmithError};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trim and collapse every whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Collapse whitespace, then turn single quotes into double quotes.
pub fn normalize_reply(text: &str) -> String {
    collapse_whitespace(text).replace('\'', "\"")
}

/// Remove Markdown code fences.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Literal quote substitutions applied before the second parse attempt.
pub fn fix_quotes(text: &str) -> String {
    text.replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2018}', "\"")
        .replace("\"you didn\"t\"", "\"you didn't\"")
}

/// The full second-chance transform.
pub fn repair_reply(normalized: &str) -> String {
    fix_quotes(&strip_code_fences(normalized))
}

/// Parse a collapsed reply, repairing it once if the strict parse fails.
pub fn parse_timeline(reply: &str) -> Result<Vec<KeywordSegment>> {
    let normalized = normalize_reply(reply);
    match serde_json::from_str(&normalized) {
        Ok(timeline) => Ok(timeline),
        Err(first) => {
            tracing::debug!("Strict parse failed ({}), repairing: {}", first, normalized);
            serde_json::from_str(&repair_reply(&normalized))
                .map_err(|e| ShortsmithError::MalformedReply(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  [[[0,\n 2],\t\t[\"a\"]]]  "), "[[[0, 2], [\"a\"]]]");
    }

    #[test]
    fn test_normalize_single_quotes() {
        assert_eq!(normalize_reply("[[[0, 2], ['cat sleeping']]]"), "[[[0, 2], [\"cat sleeping\"]]]");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json [1] ```"), " [1] ");
        assert_eq!(strip_code_fences("```[1]```"), "[1]");
    }

    #[test]
    fn test_fix_typographic_quotes() {
        assert_eq!(fix_quotes("\u{201C}cat\u{201D}"), "\"cat\"");
        assert_eq!(fix_quotes("\u{2018}dog"), "\"dog");
        assert_eq!(fix_quotes("don\u{2019}t"), "don't");
    }

    #[test]
    fn test_fix_contraction() {
        assert_eq!(fix_quotes("[\"you didn\"t\"]"), "[\"you didn't\"]");
        // Other contractions are left alone.
        assert_eq!(fix_quotes("[\"we didn\"t\"]"), "[\"we didn\"t\"]");
    }

    #[test]
    fn test_parse_strict() {
        let timeline = parse_timeline("[[[0, 2], [\"cat\"]], [[2, 4], [\"dog\"]]]").unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1], KeywordSegment::new(2.0, 4.0, ["dog"]));
    }

    #[test]
    fn test_parse_python_quoting() {
        let timeline = parse_timeline("[[[0, 2], ['rainy street', 'umbrella']]]").unwrap();
        assert_eq!(timeline[0].keywords, vec!["rainy street", "umbrella"]);
    }

    #[test]
    fn test_parse_fenced_typographic_reply() {
        let reply = "```json\n[[[0, 3], [\u{201C}crying child\u{201D}]]]\n```";
        let timeline = parse_timeline(reply).unwrap();
        assert_eq!(timeline, vec![KeywordSegment::new(0.0, 3.0, ["crying child"])]);
    }

    #[test]
    fn test_parse_apostrophe_contraction() {
        let timeline = parse_timeline("[[[0, 2], ['you didn't']]]").unwrap();
        assert_eq!(timeline[0].keywords, vec!["you didn't"]);
    }

    #[test]
    fn test_parse_unrecoverable() {
        let result = parse_timeline("Sorry, I cannot help with that.");
        assert!(matches!(result, Err(ShortsmithError::MalformedReply(_))));
    }
}
