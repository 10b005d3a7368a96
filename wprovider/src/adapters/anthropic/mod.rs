mod events;
mod provider;
mod serde_api;

pub use events::{
    AnthropicBlockDelta, AnthropicContentBlock, AnthropicErrorBody, AnthropicEventReader,
    AnthropicEventStream, AnthropicMessageDelta, AnthropicMessageStart, AnthropicStreamEvent,
    AnthropicUsage, event_stream,
};
pub use provider::{ANTHROPIC_VERSION, AnthropicProvider};
