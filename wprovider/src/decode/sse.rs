//! Server-sent-events decoder for OpenAI-style chat completion chunks.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::{FrameBuffer, FrameDecoder, FrameTerminator, ToolCallLedger};
use crate::{ProviderError, StreamEvent};

const DONE_SENTINEL: &str = "[DONE]";

/// How a backend reports text inside successive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Each frame carries only the new text.
    #[default]
    Incremental,
    /// Each frame repeats all text so far; the decoder forwards the new suffix.
    Cumulative,
}

#[derive(Debug)]
pub struct SseDecoder {
    frames: FrameBuffer,
    text_mode: TextMode,
    emitted_text: String,
    tool_calls: ToolCallLedger,
    /// Ledger slots for calls sent without a wire `index`, keyed by wire id.
    unindexed: HashMap<String, u64>,
    last_unindexed: Option<u64>,
    done: bool,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            frames: FrameBuffer::new(FrameTerminator::Newline),
            text_mode: TextMode::Incremental,
            emitted_text: String::new(),
            tool_calls: ToolCallLedger::default(),
            unindexed: HashMap::new(),
            last_unindexed: None,
            done: false,
        }
    }

    pub fn with_text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = text_mode;
        self
    }

    fn decode_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let Some(payload) = line.strip_prefix("data:") else {
            return;
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return;
        }

        if payload == DONE_SENTINEL {
            events.extend(self.tool_calls.end_all());
            events.push(StreamEvent::Completed);
            self.done = true;
            return;
        }

        let chunk = match serde_json::from_str::<ChunkPayload>(payload) {
            Ok(chunk) => chunk,
            Err(error) => {
                tracing::warn!(error = %error, "skipping unparsable SSE record");
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

        let Some(choice) = chunk.choices.into_iter().next() else {
            return;
        };

        if let Some(delta) = choice.delta {
            if let Some(content) = delta.content
                && let Some(text) = self.text_increment(content)
            {
                events.push(StreamEvent::TextDelta(text));
            }

            for call in delta.tool_calls.unwrap_or_default() {
                self.decode_tool_delta(call, events);
            }
        }

        if choice.finish_reason.is_some() {
            events.extend(self.tool_calls.end_all());
        }
    }

    fn text_increment(&mut self, content: String) -> Option<String> {
        let text = match self.text_mode {
            TextMode::Incremental => content,
            TextMode::Cumulative => {
                let shared = common_prefix_len(&self.emitted_text, &content);
                if shared < self.emitted_text.len() {
                    tracing::warn!(
                        emitted = self.emitted_text.len(),
                        kept = shared,
                        "cumulative frame rewrote emitted text"
                    );
                }

                let suffix = content[shared..].to_string();
                self.emitted_text = content;
                suffix
            }
        };

        (!text.is_empty()).then_some(text)
    }

    fn decode_tool_delta(&mut self, call: ToolCallDelta, events: &mut Vec<StreamEvent>) {
        let function = call.function.unwrap_or_default();
        let index = match call.index {
            Some(index) => index,
            None => self.unindexed_slot(call.id.as_deref(), function.name.as_deref()),
        };

        let id = match self.tool_calls.id_for(index) {
            Some(id) => id.to_string(),
            None => {
                let id = self.tool_calls.start(index, call.id.as_deref());
                events.push(StreamEvent::ToolCallStart {
                    id: id.clone(),
                    name: function.name.clone().unwrap_or_default(),
                });
                id
            }
        };

        if let Some(fragment) = function.arguments
            && !fragment.is_empty()
        {
            events.push(StreamEvent::ToolCallArguments { id, fragment });
        }
    }

    /// Some backends omit `index` and send each call whole. A new wire id or
    /// a named delta opens a new call; anything else continues the latest one.
    fn unindexed_slot(&mut self, wire_id: Option<&str>, name: Option<&str>) -> u64 {
        let wire_id = wire_id.map(str::trim).filter(|id| !id.is_empty());

        if let Some(wire_id) = wire_id
            && let Some(index) = self.unindexed.get(wire_id)
        {
            return *index;
        }

        let opens_call = wire_id.is_some() || name.is_some_and(|name| !name.is_empty());
        if !opens_call
            && let Some(index) = self.last_unindexed
            && self.tool_calls.id_for(index).is_some()
        {
            return index;
        }

        let index = self.tool_calls.next_index();
        if let Some(wire_id) = wire_id {
            self.unindexed.insert(wire_id.to_string(), index);
        }
        self.last_unindexed = Some(index);
        index
    }
}

impl FrameDecoder for SseDecoder {
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

/// Byte length of the longest shared prefix, always on a char boundary.
fn common_prefix_len(left: &str, right: &str) -> usize {
    left.char_indices()
        .zip(right.chars())
        .find(|((_, ours), theirs)| ours != theirs)
        .map(|((position, _), _)| position)
        .unwrap_or_else(|| left.len().min(right.len()))
}

pub(crate) fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: Option<u64>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<FunctionDelta>,
}

#[derive(Debug, Default, Deserialize)]
struct FunctionDelta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}
