//! Provider-agnostic chat adapters with in-stream tool execution.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wchat::{AdapterFactory, ChatContext, HistoryWindow, render_system_prompt};
//! use wprovider::{ProviderConfig, ProviderId};
//! use wtooling::ToolRegistry;
//!
//! let factory = AdapterFactory::new(Arc::new(ToolRegistry::new()))
//!     .with_system_prompt(render_system_prompt(&ChatContext::default().with_days(3)))
//!     .with_history_window(HistoryWindow::default());
//!
//! let adapter = factory
//!     .get_or_create(ProviderConfig::new(ProviderId::Ollama, ""))
//!     .expect("ollama needs no credential");
//! assert_eq!(adapter.provider_id(), ProviderId::Ollama);
//! ```

mod adapter;
mod error;
mod factory;
mod hooks;
mod prompt;
mod types;
mod window;

pub mod prelude {
    pub use crate::{
        AdapterFactory, ChatAdapter, ChatChunk, ChatContext, ChatError, ChatErrorKind, ChatHooks,
        ChatResponse, ChatStream, ChunkOrigin, HistoryWindow, NoopChatHooks, StreamOutcome,
        ToolNotices, render_system_prompt,
    };
    pub use wprovider::{ConfigOverride, Message, ProviderConfig, ProviderId, Role};
    pub use wtooling::{ToolExecutionContext, ToolInvocationResult, ToolRegistry};
}

pub use adapter::{ChatAdapter, ToolNotices};
pub use error::{ChatError, ChatErrorKind};
pub use factory::AdapterFactory;
pub use hooks::{ChatHooks, NoopChatHooks, StreamOutcome};
pub use prompt::{ChatContext, render_system_prompt};
pub use types::{ChatChunk, ChatResponse, ChatStream, ChunkOrigin};
pub use window::{DEFAULT_MAX_RECENT, HistoryWindow};
