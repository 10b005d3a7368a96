//! Metrics-based hooks for chat streams and tool calls.
//!
//! ```rust
//! use wchat::ChatHooks;
//! use wobserve::MetricsChatHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatHooks) {}
//!
//! let hooks = MetricsChatHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use wchat::{ChatHooks, StreamOutcome};
use wprovider::ProviderId;
use wtooling::{ToolError, ToolInvocationResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsChatHooks;

impl ChatHooks for MetricsChatHooks {
    fn on_stream_start(&self, provider: ProviderId, _model: &str) {
        metrics::counter!(
            "wayfarer_stream_start_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_tool_start(&self, provider: ProviderId, tool_name: &str, _invocation_id: &str) {
        metrics::counter!(
            "wayfarer_tool_execution_start_total",
            "provider" => provider.to_string(),
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_tool_finish(
        &self,
        provider: ProviderId,
        tool_name: &str,
        _invocation_id: &str,
        outcome: Result<&ToolInvocationResult, &ToolError>,
        elapsed: Duration,
    ) {
        match outcome {
            Ok(_) => {
                metrics::counter!(
                    "wayfarer_tool_execution_success_total",
                    "provider" => provider.to_string(),
                    "tool_name" => tool_name.to_string()
                )
                .increment(1);
                metrics::histogram!(
                    "wayfarer_tool_execution_duration_seconds",
                    "tool_name" => tool_name.to_string(),
                    "status" => "success"
                )
                .record(elapsed.as_secs_f64());
            }
            Err(error) => {
                metrics::counter!(
                    "wayfarer_tool_execution_failure_total",
                    "provider" => provider.to_string(),
                    "tool_name" => tool_name.to_string(),
                    "error_kind" => format!("{:?}", error.kind)
                )
                .increment(1);
                metrics::histogram!(
                    "wayfarer_tool_execution_duration_seconds",
                    "tool_name" => tool_name.to_string(),
                    "status" => "failure"
                )
                .record(elapsed.as_secs_f64());
            }
        }
    }

    fn on_stream_finish(&self, provider: ProviderId, outcome: StreamOutcome<'_>, elapsed: Duration) {
        let error_kind = match outcome {
            StreamOutcome::Failed(error) => format!("{:?}", error.kind),
            _ => "none".to_string(),
        };

        metrics::counter!(
            "wayfarer_stream_finish_total",
            "provider" => provider.to_string(),
            "outcome" => outcome.label(),
            "error_kind" => error_kind
        )
        .increment(1);
        metrics::histogram!(
            "wayfarer_stream_duration_seconds",
            "provider" => provider.to_string(),
            "outcome" => outcome.label()
        )
        .record(elapsed.as_secs_f64());
    }
}
