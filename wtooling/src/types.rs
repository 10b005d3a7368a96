//! Invocation, result and execution-context types.
//!
//! ```rust
//! use wtooling::{ToolInvocation, ToolInvocationResult};
//!
//! let invocation = ToolInvocation::from_fragments("call_1", "get_weather", r#"{"city":"成都"}"#)
//!     .expect("arguments should parse");
//! assert_eq!(invocation.arguments["city"], "成都");
//!
//! let result = ToolInvocationResult::new(serde_json::json!({"message": "晴 18°C"}));
//! assert_eq!(result.display_text(), "晴 18°C");
//! ```

use serde_json::{Map, Value};
use wcommon::{MetadataMap, SessionId};

use crate::{ToolError, parse_json_object};

pub type ToolArguments = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A backend's request to run one named tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: ToolArguments,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Builds an invocation from the concatenated argument fragments of a
    /// stream. An empty buffer means no arguments.
    pub fn from_fragments(
        id: impl Into<String>,
        name: impl Into<String>,
        buffer: &str,
    ) -> Result<Self, ToolError> {
        let id = id.into();
        let name = name.into();

        let arguments = if buffer.trim().is_empty() {
            ToolArguments::new()
        } else {
            parse_json_object(buffer).map_err(|error| {
                error
                    .with_tool_name(name.clone())
                    .with_invocation_id(id.clone())
            })?
        };

        Ok(Self {
            id,
            name,
            arguments,
        })
    }
}

/// Structured tool output plus an optional pre-rendered summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationResult {
    pub payload: Value,
    pub summary: Option<String>,
}

impl ToolInvocationResult {
    pub const FALLBACK_TEXT: &'static str = "tool call completed";

    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Text spliced into the visible stream for this result.
    pub fn display_text(&self) -> String {
        if let Some(summary) = self.summary.as_deref().filter(|summary| !summary.is_empty()) {
            return summary.to_string();
        }

        if let Some(message) = self.payload.get("message").and_then(Value::as_str) {
            return message.to_string();
        }

        if let Some(error) = self.payload.get("error").and_then(Value::as_str) {
            return format!("tool call failed: {error}");
        }

        Self::FALLBACK_TEXT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn empty_fragments_mean_empty_arguments() {
        let invocation =
            ToolInvocation::from_fragments("call_1", "list", "  ").expect("empty should parse");
        assert!(invocation.arguments.is_empty());
    }

    #[test]
    fn non_object_fragments_are_invalid_arguments() {
        for buffer in ["[1,2]", "{\"city\":", "\"text\""] {
            let error = ToolInvocation::from_fragments("call_9", "get_weather", buffer)
                .expect_err("buffer should fail");
            assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
            assert_eq!(error.tool_name.as_deref(), Some("get_weather"));
            assert_eq!(error.invocation_id.as_deref(), Some("call_9"));
        }
    }

    #[test]
    fn display_text_prefers_summary_then_message_then_error() {
        let summarized = ToolInvocationResult::new(json!({"message": "m"})).with_summary("s");
        assert_eq!(summarized.display_text(), "s");

        let message = ToolInvocationResult::new(json!({"message": "m", "error": "e"}));
        assert_eq!(message.display_text(), "m");

        let error = ToolInvocationResult::new(json!({"error": "no data"}));
        assert_eq!(error.display_text(), "tool call failed: no data");

        let bare = ToolInvocationResult::new(json!({"count": 3}));
        assert_eq!(bare.display_text(), ToolInvocationResult::FALLBACK_TEXT);
    }
}
