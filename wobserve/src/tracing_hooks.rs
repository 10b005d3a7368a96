//! Tracing-based hooks for chat streams and tool calls.
//!
//! ```rust
//! use wchat::ChatHooks;
//! use wobserve::TracingChatHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatHooks) {}
//!
//! let hooks = TracingChatHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use wchat::{ChatHooks, StreamOutcome};
use wprovider::ProviderId;
use wtooling::{ToolError, ToolInvocationResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatHooks;

impl ChatHooks for TracingChatHooks {
    fn on_stream_start(&self, provider: ProviderId, model: &str) {
        tracing::info!(phase = "stream", event = "start", provider = %provider, model);
    }

    fn on_tool_start(&self, provider: ProviderId, tool_name: &str, invocation_id: &str) {
        tracing::info!(
            phase = "tool",
            event = "start",
            provider = %provider,
            tool_name,
            invocation_id
        );
    }

    fn on_tool_finish(
        &self,
        provider: ProviderId,
        tool_name: &str,
        invocation_id: &str,
        outcome: Result<&ToolInvocationResult, &ToolError>,
        elapsed: Duration,
    ) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            Ok(_) => tracing::info!(
                phase = "tool",
                event = "success",
                provider = %provider,
                tool_name,
                invocation_id,
                elapsed_ms
            ),
            Err(error) => tracing::warn!(
                phase = "tool",
                event = "failure",
                provider = %provider,
                tool_name,
                invocation_id,
                elapsed_ms,
                error_kind = ?error.kind,
                error = %error
            ),
        }
    }

    fn on_stream_finish(&self, provider: ProviderId, outcome: StreamOutcome<'_>, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            StreamOutcome::Failed(error) => tracing::error!(
                phase = "stream",
                event = "failure",
                provider = %provider,
                elapsed_ms,
                error_kind = ?error.kind,
                retryable = error.is_retryable(),
                error = %error
            ),
            other => tracing::info!(
                phase = "stream",
                event = other.label(),
                provider = %provider,
                elapsed_ms
            ),
        }
    }
}
