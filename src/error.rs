//! Error types for Shortsmith.

use thiserror::Error;

/// Library-level error type for Shortsmith operations.
#[derive(Error, Debug)]
pub enum ShortsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion failed: {message}")]
    Completion { message: String, transient: bool },

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("No covering timeline after {attempts} attempts")]
    CoverageExhausted { attempts: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ShortsmithError {
    /// Build a completion error that a retry may resolve.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            transient: true,
        }
    }

    /// Build a completion error that retrying will not fix.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            transient: false,
        }
    }

    /// Whether re-issuing the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Completion { transient, .. } => *transient,
            Self::MalformedReply(_) => true,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status()
                        .is_some_and(|s| s.as_u16() == 429 || s.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type alias for Shortsmith operations.
pub type Result<T> = std::result::Result<T, ShortsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ShortsmithError::transient("rate limited").is_transient());
        assert!(!ShortsmithError::fatal("bad model").is_transient());
        assert!(ShortsmithError::MalformedReply("oops".into()).is_transient());
        assert!(!ShortsmithError::InvalidInput("no captions".into()).is_transient());
        assert!(!ShortsmithError::CoverageExhausted { attempts: 3 }.is_transient());
    }

    #[tokio::test]
    async fn test_http_connect_failure_is_transient() {
        // Nothing listens on the discard port.
        let error = reqwest::Client::new()
            .get("http://127.0.0.1:9/api/generate")
            .send()
            .await
            .unwrap_err();
        assert!(ShortsmithError::from(error).is_transient());
    }

    #[test]
    fn test_http_builder_error_is_fatal() {
        let error = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(!ShortsmithError::from(error).is_transient());
    }
}
