//! Unified facade over the wayfarer workspace crates.
//!
//! One dependency for applications that want provider-agnostic streaming
//! chat with in-stream tool calls. It re-exports the workspace crates and
//! adds convenience constructors and message-building macros.
//!
//! ```rust
//! use wayfarer::prelude::*;
//!
//! let mut tools = ToolRegistry::new();
//! tools.register_sync_fn(
//!     ToolDeclaration::new("get_weather", "Current weather").string_param("city", "City"),
//!     |_args, _ctx| Ok(ToolInvocationResult::new(serde_json::json!({"message": "晴"}))),
//! );
//!
//! let factory = travel_factory(tools, &ChatContext::default().with_destination("成都"));
//! let adapter = factory.get_or_create(wf_config!(local)).expect("adapter should build");
//! assert_eq!(adapter.tools().len(), 1);
//! ```

mod macros;

pub mod prelude;
pub mod providers;
pub mod util;

pub use wchat;
pub use wcommon;
pub use wobserve;
pub use wprovider;
pub use wtooling;

pub use wchat::{
    AdapterFactory, ChatAdapter, ChatChunk, ChatContext, ChatError, ChatErrorKind, ChatHooks,
    ChatResponse, ChatStream, ChunkOrigin, HistoryWindow, NoopChatHooks, StreamOutcome,
    ToolNotices, render_system_prompt,
};
pub use wcommon::{BoxFuture, GenerationOptions, MetadataMap, SessionId};
pub use wobserve::{MetricsChatHooks, SafeChatHooks, TracingChatHooks};
pub use wprovider::{
    BoxedEventStream, ConfigOverride, DEFAULT_TIMEOUT, HttpRequest, HttpTransport, Message,
    ModelEventStream, ModelProvider, ModelRequest, ModelResponse, ParameterKind, ParameterSchema,
    ParameterSpec, ProviderCapabilities, ProviderConfig, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, ReqwestTransport, Role, SecretString, StreamEvent, TokenUsage,
    ToolCall, ToolDeclaration, VecEventStream,
};
pub use wtooling::{
    FunctionTool, Tool, ToolArguments, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolFuture, ToolInvocation, ToolInvocationResult, ToolRegistry, optional_string,
    parse_json_object, parse_json_value, required_string,
};

pub use providers::{
    build_provider, build_provider_with_timeout, build_provider_with_transport,
    supported_providers,
};
pub use util::{assistant_message, parse_provider_id, travel_factory, user_message};
