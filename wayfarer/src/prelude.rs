//! Common imports for most wayfarer applications.

pub use crate::{
    assistant_message, build_provider, build_provider_with_timeout, parse_provider_id,
    supported_providers, travel_factory, user_message,
};
pub use crate::{wf_config, wf_messages, wf_msg, wf_provider};
pub use crate::{
    AdapterFactory, ChatAdapter, ChatChunk, ChatContext, ChatError, ChatErrorKind, ChatHooks,
    ChatResponse, ChatStream, ChunkOrigin, ConfigOverride, FunctionTool, HistoryWindow, Message,
    MetricsChatHooks, ModelProvider, ParameterKind, ProviderConfig, ProviderError, ProviderId,
    Role, SafeChatHooks, SessionId, StreamOutcome, Tool, ToolDeclaration, ToolError,
    ToolExecutionContext, ToolInvocationResult, ToolNotices, ToolRegistry, TracingChatHooks,
    render_system_prompt,
};
