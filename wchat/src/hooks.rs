//! Lifecycle hooks for streaming exchanges and tool calls.
//!
//! ```rust
//! use wchat::{ChatHooks, NoopChatHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ChatHooks) {}
//!
//! let hooks = NoopChatHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use wprovider::ProviderId;
use wtooling::{ToolError, ToolInvocationResult};

use crate::ChatError;

/// How a streaming exchange ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamOutcome<'a> {
    Completed,
    Failed(&'a ChatError),
    /// The caller dropped the stream before it terminated.
    Cancelled,
}

impl StreamOutcome<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

pub trait ChatHooks: Send + Sync {
    fn on_stream_start(&self, _provider: ProviderId, _model: &str) {}

    fn on_tool_start(&self, _provider: ProviderId, _tool_name: &str, _invocation_id: &str) {}

    fn on_tool_finish(
        &self,
        _provider: ProviderId,
        _tool_name: &str,
        _invocation_id: &str,
        _outcome: Result<&ToolInvocationResult, &ToolError>,
        _elapsed: Duration,
    ) {
    }

    fn on_stream_finish(&self, _provider: ProviderId, _outcome: StreamOutcome<'_>, _elapsed: Duration) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatHooks;

impl ChatHooks for NoopChatHooks {}
