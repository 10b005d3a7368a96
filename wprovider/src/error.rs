//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use wprovider::{ProviderError, ProviderErrorKind};
//!
//! let denied = ProviderError::upstream(401, r#"{"error":{"message":"bad key"}}"#);
//! assert_eq!(denied.kind, ProviderErrorKind::Upstream);
//! assert!(denied.is_invalid_credential());
//! assert!(!denied.retryable);
//!
//! let timeout = ProviderError::timeout("request timed out");
//! assert!(timeout.retryable);
//! assert!(timeout.is_network());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upstream bodies are kept for diagnostics but capped at this many bytes.
pub const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Configuration,
    Upstream,
    MalformedResponse,
    StreamDecode,
    Timeout,
    Transport,
    UnsupportedProvider,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
    pub status: Option<u16>,
    pub body: Option<String>,
    /// Set for a missing API key and for 401/403 responses.
    pub invalid_credential: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            status: None,
            body: None,
            invalid_credential: false,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message, false)
    }

    /// Configuration failure caused by a blank API key.
    pub fn missing_credential(provider: impl Display) -> Self {
        Self {
            invalid_credential: true,
            ..Self::configuration(format!("{provider} requires an API key"))
        }
    }

    /// Non-success HTTP response. The message is lifted from the body when
    /// it carries a recognizable error object.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let body = truncate_body(body.into());
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Self {
            kind: ProviderErrorKind::Upstream,
            message,
            retryable: status == 429 || status >= 500,
            status: Some(status),
            body: Some(body),
            invalid_credential: matches!(status, 401 | 403),
        }
    }

    /// Error reported inside an otherwise successful stream.
    pub fn upstream_event(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Upstream, message, false)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message, false)
    }

    pub fn stream_decode(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::StreamDecode, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unsupported_provider(provider: impl Display) -> Self {
        Self::new(
            ProviderErrorKind::UnsupportedProvider,
            format!("unsupported AI provider: {provider}"),
            false,
        )
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Cancelled, message, false)
    }

    pub fn is_invalid_credential(&self) -> bool {
        self.invalid_credential
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ProviderErrorKind::Timeout || matches!(self.status, Some(408 | 504))
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self.kind,
            ProviderErrorKind::Transport | ProviderErrorKind::Timeout
        )
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({status}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}

fn truncate_body(mut body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body;
    }

    let mut cut = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body.truncate(cut);
    body
}

/// Pulls the human-readable message out of the error envelopes used by the
/// supported backends: `{"error":{"message":..}}`, `{"error":".."}` and
/// `{"message":..}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let message = match value.get("error") {
        Some(serde_json::Value::String(message)) => Some(message.as_str()),
        Some(error) => error.get("message").and_then(serde_json::Value::as_str),
        None => value.get("message").and_then(serde_json::Value::as_str),
    }?;

    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_lifts_message_from_known_envelopes() {
        let openai = ProviderError::upstream(400, r#"{"error":{"message":"bad model"}}"#);
        assert_eq!(openai.message, "bad model");

        let ollama = ProviderError::upstream(404, r#"{"error":"model not found"}"#);
        assert_eq!(ollama.message, "model not found");

        let plain = ProviderError::upstream(502, "<html>gateway</html>");
        assert_eq!(plain.message, "request failed with status 502");
        assert_eq!(plain.body.as_deref(), Some("<html>gateway</html>"));
        assert!(plain.retryable);
    }

    #[test]
    fn upstream_body_is_truncated_on_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY_BYTES);
        let error = ProviderError::upstream(500, body);

        let kept = error.body.expect("body should be kept");
        assert!(kept.len() <= MAX_ERROR_BODY_BYTES);
        assert!(kept.chars().all(|ch| ch == 'é'));
    }

    #[test]
    fn classification_helpers_distinguish_failure_families() {
        assert!(ProviderError::upstream(403, "").is_invalid_credential());
        assert!(ProviderError::missing_credential("openai").is_invalid_credential());
        assert!(!ProviderError::configuration("model must not be empty").is_invalid_credential());
        assert!(!ProviderError::upstream(500, "").is_invalid_credential());

        assert!(ProviderError::upstream(504, "").is_timeout());
        assert!(ProviderError::timeout("slow").is_timeout());

        assert!(ProviderError::transport("reset").is_network());
        assert!(!ProviderError::upstream(429, "").is_network());
        assert!(ProviderError::upstream(429, "").retryable);
    }

    #[test]
    fn display_includes_status_when_present() {
        let error = ProviderError::upstream(401, r#"{"error":{"message":"nope"}}"#);
        assert_eq!(error.to_string(), "Upstream (401): nope");
        assert_eq!(
            ProviderError::stream_decode("cut").to_string(),
            "StreamDecode: cut"
        );
    }
}
