//! Typed Anthropic streaming events and the record reader that produces them.
//!
//! ```rust
//! use wprovider::adapters::anthropic::{AnthropicEventReader, AnthropicStreamEvent};
//!
//! let mut reader = AnthropicEventReader::new();
//! let events = reader
//!     .push(b"event: ping\ndata: {\"type\":\"ping\"}\n\n")
//!     .expect("record should decode");
//! assert_eq!(events, vec![AnthropicStreamEvent::Ping]);
//! ```

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;

use crate::decode::{FrameBuffer, FrameTerminator};
use crate::transport::ByteStream;
use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    MessageStart {
        #[serde(default)]
        message: Option<AnthropicMessageStart>,
    },
    ContentBlockStart {
        index: u64,
        content_block: AnthropicContentBlock,
    },
    ContentBlockDelta {
        index: u64,
        delta: AnthropicBlockDelta,
    },
    ContentBlockStop {
        index: u64,
    },
    MessageDelta {
        #[serde(default)]
        delta: Option<AnthropicMessageDelta>,
        #[serde(default)]
        usage: Option<AnthropicUsage>,
    },
    MessageStop,
    Ping,
    Error {
        error: AnthropicErrorBody,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicMessageStart {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicMessageDelta {
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicBlockDelta {
    TextDelta {
        text: String,
    },
    InputJsonDelta {
        #[serde(default)]
        partial_json: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnthropicErrorBody {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

pub type AnthropicEventStream<'a> =
    Pin<Box<dyn Stream<Item = Result<AnthropicStreamEvent, ProviderError>> + Send + 'a>>;

/// Splits an event-stream body into records and parses each `data` payload.
#[derive(Debug)]
pub struct AnthropicEventReader {
    frames: FrameBuffer,
}

impl Default for AnthropicEventReader {
    fn default() -> Self {
        Self::new()
    }
}

impl AnthropicEventReader {
    pub fn new() -> Self {
        Self {
            frames: FrameBuffer::new(FrameTerminator::BlankLine),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<AnthropicStreamEvent>, ProviderError> {
        let records = self.frames.push(chunk)?;
        Ok(records.iter().filter_map(|record| parse_record(record)).collect())
    }

    pub fn finish(&mut self) -> Result<(), ProviderError> {
        self.frames.finish()
    }
}

fn parse_record(record: &str) -> Option<AnthropicStreamEvent> {
    let data = record
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|payload| payload.strip_prefix(' ').unwrap_or(payload))
        .collect::<Vec<_>>()
        .join("\n");

    if data.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&data) {
        Ok(event) => Some(event),
        Err(error) => {
            tracing::warn!(error = %error, "skipping unparsable Anthropic event record");
            None
        }
    }
}

/// Typed event stream over a raw response body.
pub fn event_stream<'a>(mut bytes: ByteStream<'a>) -> AnthropicEventStream<'a> {
    Box::pin(try_stream! {
        let mut reader = AnthropicEventReader::new();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for event in reader.push(&chunk)? {
                yield event;
            }
        }
        reader.finish()?;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_parses_typed_events_and_skips_unknown_noise() {
        let body = concat!(
            "event: message_start\n",
            "data: {\"type\":\"message_start\",\"message\":{\"model\":\"claude\",\"usage\":{\"input_tokens\":9}}}\n\n",
            "event: content_block_start\n",
            "data: {\"type\":\"content_block_start\",\"index\":1,\"content_block\":{\"type\":\"tool_use\",\"id\":\"toolu_1\",\"name\":\"get_weather\",\"input\":{}}}\n\n",
            "data: {broken\n\n",
            "data: {\"type\":\"content_block_delta\",\"index\":1,\"delta\":{\"type\":\"input_json_delta\",\"partial_json\":\"{\\\"city\\\"\"}}\n\n",
            "data: {\"type\":\"future_event\"}\n\n",
        );

        let mut reader = AnthropicEventReader::new();
        let events = reader.push(body.as_bytes()).expect("body should decode");

        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            AnthropicStreamEvent::MessageStart { message: Some(start) }
                if start.usage.map(|usage| usage.input_tokens) == Some(9)
        ));
        assert!(matches!(
            &events[1],
            AnthropicStreamEvent::ContentBlockStart {
                index: 1,
                content_block: AnthropicContentBlock::ToolUse { name, .. }
            } if name == "get_weather"
        ));
        assert_eq!(
            events[2],
            AnthropicStreamEvent::ContentBlockDelta {
                index: 1,
                delta: AnthropicBlockDelta::InputJsonDelta {
                    partial_json: "{\"city\"".into()
                }
            }
        );
        assert_eq!(events[3], AnthropicStreamEvent::Unknown);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn error_events_carry_type_and_message() {
        let mut reader = AnthropicEventReader::new();
        let events = reader
            .push(b"event: error\ndata: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n")
            .expect("record should decode");

        assert_eq!(
            events,
            vec![AnthropicStreamEvent::Error {
                error: AnthropicErrorBody {
                    kind: "overloaded_error".into(),
                    message: "Overloaded".into()
                }
            }]
        );
    }
}
