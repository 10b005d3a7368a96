//! Stream decoders that turn arbitrarily chunked bytes into [`StreamEvent`]s.
//!
//! Line-oriented wire formats implement [`FrameDecoder`] on top of the shared
//! [`FrameBuffer`]; [`decode_stream`] drives one over a transport byte stream
//! and enforces the single-terminal rule.
//!
//! ```rust
//! use wprovider::StreamEvent;
//! use wprovider::decode::{DecodeSession, SseDecoder};
//!
//! let mut session = DecodeSession::new(SseDecoder::new());
//! let mut events = session.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n");
//! events.extend(session.feed(b"data: [DONE]\n"));
//! events.extend(session.finish());
//!
//! assert_eq!(
//!     events,
//!     vec![StreamEvent::TextDelta("Hi".into()), StreamEvent::Completed]
//! );
//! ```

mod framing;
#[cfg(feature = "provider-anthropic")]
mod native;
mod ndjson;
mod sse;

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;

pub use framing::{FrameBuffer, FrameTerminator, MAX_FRAME_BYTES};
#[cfg(feature = "provider-anthropic")]
pub use native::{NativeEventDecoder, retag_stream};
pub use ndjson::NdjsonDecoder;
pub use sse::{SseDecoder, TextMode};

use crate::transport::ByteStream;
use crate::{BoxedEventStream, ProviderError, StreamEvent, TerminalGuard};

/// Incremental decoder for one wire format.
pub trait FrameDecoder: Send {
    fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent>;

    /// Called once when the transport ends.
    fn finish(&mut self) -> Vec<StreamEvent>;
}

/// Wraps a decoder so that its output honors the stream invariants.
#[derive(Debug)]
pub struct DecodeSession<D> {
    decoder: D,
    guard: TerminalGuard,
}

impl<D> DecodeSession<D>
where
    D: FrameDecoder,
{
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            guard: TerminalGuard::new(),
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn is_terminated(&self) -> bool {
        self.guard.is_terminated()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.guard.is_terminated() {
            return Vec::new();
        }
        let events = self.decoder.feed(chunk);
        self.guard.admit(events)
    }

    pub fn fail(&mut self, error: ProviderError) -> Vec<StreamEvent> {
        self.guard.fail(error)
    }

    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.guard.is_terminated() {
            return Vec::new();
        }

        let mut events = self.guard.admit(self.decoder.finish());
        if !self.guard.is_terminated() {
            events.extend(self.guard.admit(vec![StreamEvent::Completed]));
        }
        events
    }
}

/// Drives `decoder` over a transport byte stream. Reading stops at the first
/// terminal event, which drops the transport stream.
pub fn decode_stream<'a, D>(mut bytes: ByteStream<'a>, decoder: D) -> BoxedEventStream<'a>
where
    D: FrameDecoder + 'a,
{
    let mut session = DecodeSession::new(decoder);

    Box::pin(async_stream::stream! {
        while let Some(chunk) = bytes.next().await {
            let events = match chunk {
                Ok(chunk) => session.feed(&chunk),
                Err(error) => session.fail(error),
            };
            for event in events {
                yield event;
            }
            if session.is_terminated() {
                return;
            }
        }

        for event in session.finish() {
            yield event;
        }
    })
}

/// Tracks open tool calls by wire index, in start order.
#[derive(Debug, Default)]
pub(crate) struct ToolCallLedger {
    by_index: HashMap<u64, String>,
    open: Vec<String>,
    used: HashSet<String>,
}

impl ToolCallLedger {
    /// Registers a new call and returns its stream-unique id.
    pub(crate) fn start(&mut self, index: u64, proposed_id: Option<&str>) -> String {
        let base = proposed_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("call_{index}"));

        let mut id = base.clone();
        let mut suffix = 1;
        while self.used.contains(&id) {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }

        self.used.insert(id.clone());
        self.by_index.insert(index, id.clone());
        self.open.push(id.clone());
        id
    }

    pub(crate) fn id_for(&self, index: u64) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    /// First ledger slot not taken by an open call.
    pub(crate) fn next_index(&self) -> u64 {
        let mut index = self.used.len() as u64;
        while self.by_index.contains_key(&index) {
            index += 1;
        }
        index
    }

    /// Closes one call if it is still open.
    pub(crate) fn end(&mut self, index: u64) -> Option<StreamEvent> {
        let id = self.by_index.remove(&index)?;
        let position = self.open.iter().position(|open| *open == id)?;
        self.open.remove(position);
        Some(StreamEvent::ToolCallEnd { id })
    }

    /// Closes every open call in start order.
    pub(crate) fn end_all(&mut self) -> Vec<StreamEvent> {
        self.by_index.clear();
        self.open
            .drain(..)
            .map(|id| StreamEvent::ToolCallEnd { id })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_makes_ids_unique_and_closes_in_start_order() {
        let mut ledger = ToolCallLedger::default();
        let first = ledger.start(0, Some("dup"));
        let second = ledger.start(1, Some("dup"));
        let third = ledger.start(2, None);

        assert_eq!(first, "dup");
        assert_eq!(second, "dup_1");
        assert_eq!(third, "call_2");
        assert_eq!(ledger.id_for(1), Some("dup_1"));

        assert_eq!(
            ledger.end(1),
            Some(StreamEvent::ToolCallEnd { id: "dup_1".into() })
        );
        assert_eq!(ledger.end(1), None);
        assert_eq!(
            ledger.end_all(),
            vec![
                StreamEvent::ToolCallEnd { id: "dup".into() },
                StreamEvent::ToolCallEnd { id: "call_2".into() },
            ]
        );
    }

    struct SilentDecoder;

    impl FrameDecoder for SilentDecoder {
        fn feed(&mut self, _chunk: &[u8]) -> Vec<StreamEvent> {
            vec![StreamEvent::TextDelta("x".into())]
        }

        fn finish(&mut self) -> Vec<StreamEvent> {
            Vec::new()
        }
    }

    #[test]
    fn session_supplies_terminal_when_decoder_omits_one() {
        let mut session = DecodeSession::new(SilentDecoder);
        assert_eq!(session.feed(b"a"), vec![StreamEvent::TextDelta("x".into())]);
        assert_eq!(session.finish(), vec![StreamEvent::Completed]);
        assert!(session.finish().is_empty());
        assert!(session.feed(b"b").is_empty());
    }

    #[tokio::test]
    async fn decode_stream_stops_after_transport_error() {
        let chunks: Vec<Result<Vec<u8>, ProviderError>> = vec![
            Ok(b"a".to_vec()),
            Err(ProviderError::transport("connection reset")),
            Ok(b"b".to_vec()),
        ];
        let bytes: ByteStream<'static> = Box::pin(futures_util::stream::iter(chunks));

        let events = decode_stream(bytes, SilentDecoder)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta("x".into()),
                StreamEvent::Failed(ProviderError::transport("connection reset")),
            ]
        );
    }
}
