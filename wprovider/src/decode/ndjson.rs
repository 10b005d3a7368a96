//! Newline-delimited JSON decoder for Ollama-style chat streams.

use serde::Deserialize;
use serde_json::Value;

use super::sse::error_message;
use super::{FrameBuffer, FrameDecoder, FrameTerminator, ToolCallLedger};
use crate::{ProviderError, StreamEvent, TokenUsage};

#[derive(Debug)]
pub struct NdjsonDecoder {
    frames: FrameBuffer,
    tool_calls: ToolCallLedger,
    usage: Option<TokenUsage>,
    done: bool,
}

impl Default for NdjsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self {
            frames: FrameBuffer::new(FrameTerminator::Newline),
            tool_calls: ToolCallLedger::default(),
            usage: None,
            done: false,
        }
    }

    /// Token counts reported by the final object, once seen.
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }

    fn decode_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let chunk = match serde_json::from_str::<ChatChunk>(line) {
            Ok(chunk) => chunk,
            Err(error) => {
                tracing::warn!(error = %error, "skipping unparsable NDJSON line");
                return;
            }
        };

        if let Some(error) = chunk.error {
            events.push(StreamEvent::Failed(ProviderError::upstream_event(
                error_message(&error),
            )));
            self.done = true;
            return;
        }

        if let Some(message) = chunk.message {
            if let Some(content) = message.content
                && !content.is_empty()
            {
                events.push(StreamEvent::TextDelta(content));
            }

            for call in message.tool_calls.unwrap_or_default() {
                let index = self.tool_calls.next_index();
                let id = self.tool_calls.start(index, None);
                events.push(StreamEvent::ToolCallStart {
                    id: id.clone(),
                    name: call.function.name,
                });
                match call.function.arguments {
                    Value::Null => {}
                    Value::String(fragment) => {
                        events.push(StreamEvent::ToolCallArguments { id, fragment })
                    }
                    arguments => events.push(StreamEvent::ToolCallArguments {
                        id,
                        fragment: arguments.to_string(),
                    }),
                }
                events.extend(self.tool_calls.end(index));
            }
        }

        if chunk.done {
            self.usage = Some(TokenUsage {
                input_tokens: chunk.prompt_eval_count.unwrap_or_default(),
                output_tokens: chunk.eval_count.unwrap_or_default(),
            });
            events.extend(self.tool_calls.end_all());
            events.push(StreamEvent::Completed);
            self.done = true;
        }
    }
}

impl FrameDecoder for NdjsonDecoder {
    fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }

        let lines = match self.frames.push(chunk) {
            Ok(lines) => lines,
            Err(error) => {
                self.done = true;
                return vec![StreamEvent::Failed(error)];
            }
        };

        let mut events = Vec::new();
        for line in lines {
            self.decode_line(&line, &mut events);
            if self.done {
                break;
            }
        }
        events
    }

    fn finish(&mut self) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }
        self.done = true;

        match self.frames.finish() {
            Ok(()) => {
                let mut events = self.tool_calls.end_all();
                events.push(StreamEvent::Completed);
                events
            }
            Err(error) => vec![StreamEvent::Failed(error)],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ChunkToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChunkToolCall {
    function: ChunkFunction,
}

#[derive(Debug, Deserialize)]
struct ChunkFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}
