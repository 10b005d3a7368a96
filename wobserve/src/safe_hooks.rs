use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use wchat::{ChatHooks, StreamOutcome};
use wprovider::ProviderId;
use wtooling::{ToolError, ToolInvocationResult};

/// Wraps hooks so a panicking callback never reaches the chat stream.
pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatHooks for SafeChatHooks<H>
where
    H: ChatHooks,
{
    fn on_stream_start(&self, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stream_start(provider, model)
        }));
    }

    fn on_tool_start(&self, provider: ProviderId, tool_name: &str, invocation_id: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_tool_start(provider, tool_name, invocation_id)
        }));
    }

    fn on_tool_finish(
        &self,
        provider: ProviderId,
        tool_name: &str,
        invocation_id: &str,
        outcome: Result<&ToolInvocationResult, &ToolError>,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_tool_finish(provider, tool_name, invocation_id, outcome, elapsed)
        }));
    }

    fn on_stream_finish(&self, provider: ProviderId, outcome: StreamOutcome<'_>, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stream_finish(provider, outcome, elapsed)
        }));
    }
}
