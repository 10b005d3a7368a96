//! Uniform streaming event contract and in-memory stream utilities.
//!
//! ```rust
//! use wprovider::{BoxedEventStream, StreamEvent, VecEventStream};
//!
//! let events = vec![StreamEvent::TextDelta("hello".into()), StreamEvent::Completed];
//! assert!(events[1].is_terminal());
//!
//! let _stream: BoxedEventStream<'static> = Box::pin(VecEventStream::new(events));
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Newly generated text. Never cumulative.
    TextDelta(String),
    ToolCallStart {
        id: String,
        name: String,
    },
    ToolCallArguments {
        id: String,
        fragment: String,
    },
    /// The argument set for `id` is complete.
    ToolCallEnd {
        id: String,
    },
    Completed,
    Failed(ProviderError),
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

/// Provider stream contract.
///
/// Invariants for consumers:
/// - Events are emitted in wire order.
/// - Exactly one `Completed` or `Failed` ends the sequence and nothing follows it.
/// - Tool-call ids are unique within one stream, and every `ToolCallStart`
///   is followed by its `ToolCallEnd` or by `Failed`.
pub trait ModelEventStream: Stream<Item = StreamEvent> + Send {}

impl<T> ModelEventStream for T where T: Stream<Item = StreamEvent> + Send {}

pub type BoxedEventStream<'a> = Pin<Box<dyn ModelEventStream + 'a>>;

#[derive(Debug)]
pub struct VecEventStream {
    events: VecDeque<StreamEvent>,
}

impl VecEventStream {
    pub fn new(events: Vec<StreamEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for VecEventStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        Poll::Ready(self.events.pop_front())
    }
}

/// Enforces the single-terminal rule over batches of decoded events.
#[derive(Debug, Default)]
pub struct TerminalGuard {
    terminated: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Passes events through up to and including the first terminal one.
    pub fn admit(&mut self, events: Vec<StreamEvent>) -> Vec<StreamEvent> {
        if self.terminated {
            return Vec::new();
        }

        let mut admitted = Vec::with_capacity(events.len());
        for event in events {
            let terminal = event.is_terminal();
            admitted.push(event);
            if terminal {
                self.terminated = true;
                break;
            }
        }
        admitted
    }

    pub fn fail(&mut self, error: ProviderError) -> Vec<StreamEvent> {
        self.admit(vec![StreamEvent::Failed(error)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_drops_everything_after_first_terminal() {
        let mut guard = TerminalGuard::new();

        let first = guard.admit(vec![
            StreamEvent::TextDelta("a".into()),
            StreamEvent::Completed,
            StreamEvent::TextDelta("late".into()),
        ]);
        assert_eq!(
            first,
            vec![StreamEvent::TextDelta("a".into()), StreamEvent::Completed]
        );
        assert!(guard.is_terminated());

        assert!(guard.admit(vec![StreamEvent::TextDelta("b".into())]).is_empty());
        assert!(guard.fail(ProviderError::transport("late")).is_empty());
    }
}
