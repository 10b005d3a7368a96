//! Production-friendly observability hooks for chat streams and tool calls.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wobserve::{MetricsChatHooks, SafeChatHooks, TracingChatHooks};
//! use wchat::ChatHooks;
//!
//! let _tracing: Arc<dyn ChatHooks> = Arc::new(SafeChatHooks::new(TracingChatHooks));
//! let _metrics: Arc<dyn ChatHooks> = Arc::new(MetricsChatHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsChatHooks;
pub use safe_hooks::SafeChatHooks;
pub use tracing_hooks::TracingChatHooks;

pub mod prelude {
    pub use crate::{MetricsChatHooks, SafeChatHooks, TracingChatHooks};
}
