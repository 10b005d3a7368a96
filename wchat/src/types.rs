//! Chat chunk, response and stream types.

use std::pin::Pin;

use futures_core::Stream;
use wprovider::{TokenUsage, ToolCall};

use crate::ChatError;

/// Where a piece of visible text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOrigin {
    Model,
    ToolProgress,
    ToolResult,
    ToolFailure,
}

/// One incremental slice of the visible response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChunk {
    pub text: String,
    pub origin: ChunkOrigin,
}

impl ChatChunk {
    pub fn new(origin: ChunkOrigin, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChunkOrigin::Model, text)
    }

    pub fn is_tool_output(&self) -> bool {
        self.origin != ChunkOrigin::Model
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Calls requested by a single-shot completion. They are reported, not run.
    pub tool_calls: Vec<ToolCall>,
}

pub type ChatStream<'a> = Pin<Box<dyn Stream<Item = Result<ChatChunk, ChatError>> + Send + 'a>>;
