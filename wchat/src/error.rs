//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use wprovider::{ProviderError, ProviderErrorKind};
use wtooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Configuration,
    Provider,
    UnsupportedProvider,
    Tooling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    /// Original provider error, when the failure came from a driver.
    pub provider: Option<ProviderError>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Configuration, message)
    }

    pub fn unsupported_provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::UnsupportedProvider, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn is_invalid_credential(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(ProviderError::is_invalid_credential)
    }

    pub fn is_timeout(&self) -> bool {
        self.provider.as_ref().is_some_and(ProviderError::is_timeout)
    }

    pub fn is_network(&self) -> bool {
        self.provider.as_ref().is_some_and(ProviderError::is_network)
    }

    pub fn is_retryable(&self) -> bool {
        self.provider.as_ref().is_some_and(|error| error.retryable)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.provider
            .as_ref()
            .map(|error| error as &(dyn Error + 'static))
    }
}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Configuration => ChatErrorKind::Configuration,
            ProviderErrorKind::UnsupportedProvider => ChatErrorKind::UnsupportedProvider,
            _ => ChatErrorKind::Provider,
        };

        Self {
            kind,
            message: value.to_string(),
            provider: Some(value),
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        ChatError::tooling(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_classification() {
        let error = ChatError::from(ProviderError::upstream(401, r#"{"error":{"message":"bad key"}}"#));

        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert!(error.is_invalid_credential());
        assert!(!error.is_network());
        assert!(error.source().is_some());
    }

    #[test]
    fn configuration_and_unsupported_kinds_map_through() {
        let configuration = ChatError::from(ProviderError::missing_credential("deepseek"));
        assert_eq!(configuration.kind, ChatErrorKind::Configuration);
        assert!(configuration.is_invalid_credential());

        let unsupported = ChatError::from(ProviderError::unsupported_provider("mistral"));
        assert_eq!(unsupported.kind, ChatErrorKind::UnsupportedProvider);
    }

    #[test]
    fn timeouts_are_network_and_retryable() {
        let error = ChatError::from(ProviderError::timeout("no response in 90s"));
        assert!(error.is_timeout());
        assert!(error.is_network());
        assert!(error.is_retryable());
    }

    #[test]
    fn chat_only_errors_have_no_provider_detail() {
        let error = ChatError::tooling("tool execution requires a tokio runtime");
        assert!(!error.is_invalid_credential());
        assert!(error.source().is_none());
        assert_eq!(
            error.to_string(),
            "Tooling: tool execution requires a tokio runtime"
        );
    }
}
