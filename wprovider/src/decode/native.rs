//! Re-tagging decoder for natively typed Anthropic events.
//!
//! No byte handling happens here; the event reader already produced typed
//! values, so each one maps onto zero or more uniform events.

use futures_util::StreamExt;
use serde_json::Value;

use super::ToolCallLedger;
use crate::adapters::anthropic::{
    AnthropicBlockDelta, AnthropicContentBlock, AnthropicEventStream, AnthropicStreamEvent,
};
use crate::{BoxedEventStream, ProviderError, StreamEvent, TerminalGuard, TokenUsage};

#[derive(Debug, Default)]
pub struct NativeEventDecoder {
    tool_calls: ToolCallLedger,
    usage: TokenUsage,
}

impl NativeEventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    pub fn retag(&mut self, event: AnthropicStreamEvent) -> Vec<StreamEvent> {
        match event {
            AnthropicStreamEvent::MessageStart { message } => {
                if let Some(usage) = message.and_then(|message| message.usage) {
                    self.usage.input_tokens = usage.input_tokens;
                }
                Vec::new()
            }
            AnthropicStreamEvent::ContentBlockStart {
                index,
                content_block,
            } => match content_block {
                AnthropicContentBlock::Text { text } if !text.is_empty() => {
                    vec![StreamEvent::TextDelta(text)]
                }
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    let id = self.tool_calls.start(index, Some(&id));
                    let mut events = vec![StreamEvent::ToolCallStart {
                        id: id.clone(),
                        name,
                    }];
                    if let Value::Object(fields) = &input
                        && !fields.is_empty()
                    {
                        events.push(StreamEvent::ToolCallArguments {
                            id,
                            fragment: input.to_string(),
                        });
                    }
                    events
                }
                _ => Vec::new(),
            },
            AnthropicStreamEvent::ContentBlockDelta { index, delta } => match delta {
                AnthropicBlockDelta::TextDelta { text } if !text.is_empty() => {
                    vec![StreamEvent::TextDelta(text)]
                }
                AnthropicBlockDelta::InputJsonDelta { partial_json } if !partial_json.is_empty() => {
                    match self.tool_calls.id_for(index) {
                        Some(id) => vec![StreamEvent::ToolCallArguments {
                            id: id.to_string(),
                            fragment: partial_json,
                        }],
                        None => {
                            tracing::warn!(index, "argument delta for unknown content block");
                            Vec::new()
                        }
                    }
                }
                _ => Vec::new(),
            },
            AnthropicStreamEvent::ContentBlockStop { index } => {
                self.tool_calls.end(index).into_iter().collect()
            }
            AnthropicStreamEvent::MessageDelta { usage, .. } => {
                if let Some(usage) = usage {
                    self.usage.output_tokens = usage.output_tokens;
                }
                Vec::new()
            }
            AnthropicStreamEvent::MessageStop => self.finish(),
            AnthropicStreamEvent::Error { error } => {
                let message = if error.kind.is_empty() {
                    error.message
                } else {
                    format!("{}: {}", error.kind, error.message)
                };
                vec![StreamEvent::Failed(ProviderError::upstream_event(message))]
            }
            AnthropicStreamEvent::Ping | AnthropicStreamEvent::Unknown => Vec::new(),
        }
    }

    /// Closes open tool calls and completes the stream.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = self.tool_calls.end_all();
        events.push(StreamEvent::Completed);
        events
    }
}

/// Maps a typed event stream onto the uniform event contract.
pub fn retag_stream<'a>(mut events: AnthropicEventStream<'a>) -> BoxedEventStream<'a> {
    Box::pin(async_stream::stream! {
        let mut decoder = NativeEventDecoder::new();
        let mut guard = TerminalGuard::new();

        while let Some(item) = events.next().await {
            let batch = match item {
                Ok(event) => guard.admit(decoder.retag(event)),
                Err(error) => guard.fail(error),
            };
            for event in batch {
                yield event;
            }
            if guard.is_terminated() {
                return;
            }
        }

        for event in guard.admit(decoder.finish()) {
            yield event;
        }
    })
}
