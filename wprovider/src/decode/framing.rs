//! Character-safe frame splitting shared by the line-oriented decoders.
//!
//! ```rust
//! use wprovider::decode::{FrameBuffer, FrameTerminator};
//!
//! let mut buffer = FrameBuffer::new(FrameTerminator::Newline);
//! let bytes = "data: 你好\n".as_bytes();
//!
//! // split in the middle of a multi-byte character
//! assert!(buffer.push(&bytes[..7]).expect("valid prefix").is_empty());
//! let frames = buffer.push(&bytes[7..]).expect("valid suffix");
//! assert_eq!(frames, vec!["data: 你好".to_string()]);
//! assert!(buffer.finish().is_ok());
//! ```

use crate::ProviderError;

/// Upper bound for one buffered frame.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTerminator {
    /// One frame per line. A trailing `\r` is stripped.
    Newline,
    /// Frames are groups of lines separated by an empty line.
    BlankLine,
}

#[derive(Debug)]
pub struct FrameBuffer {
    terminator: FrameTerminator,
    max_frame_bytes: usize,
    /// Bytes of an incomplete UTF-8 sequence.
    partial: Vec<u8>,
    /// Decoded text not yet terminated by a newline.
    line: String,
    /// Completed lines of the current `BlankLine` record.
    record: Vec<String>,
    record_bytes: usize,
}

impl FrameBuffer {
    pub fn new(terminator: FrameTerminator) -> Self {
        Self {
            terminator,
            max_frame_bytes: MAX_FRAME_BYTES,
            partial: Vec::new(),
            line: String::new(),
            record: Vec::new(),
            record_bytes: 0,
        }
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// Appends raw bytes and returns every frame they complete.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, ProviderError> {
        self.partial.extend_from_slice(chunk);

        let valid = match std::str::from_utf8(&self.partial) {
            Ok(text) => {
                self.line.push_str(text);
                self.partial.len()
            }
            Err(error) if error.error_len().is_some() => {
                return Err(ProviderError::stream_decode(format!(
                    "stream is not valid UTF-8: {error}"
                )));
            }
            Err(error) => {
                let valid = error.valid_up_to();
                let text = std::str::from_utf8(&self.partial[..valid])
                    .map_err(|error| ProviderError::stream_decode(error.to_string()))?;
                self.line.push_str(text);
                valid
            }
        };
        self.partial.drain(..valid);

        let frames = self.split_lines();
        if self.line.len() + self.record_bytes > self.max_frame_bytes {
            return Err(ProviderError::stream_decode(format!(
                "frame exceeds {} bytes",
                self.max_frame_bytes
            )));
        }

        Ok(frames)
    }

    /// Checks that the input ended on a frame boundary.
    pub fn finish(&mut self) -> Result<(), ProviderError> {
        if !self.partial.is_empty() {
            return Err(ProviderError::stream_decode(
                "stream ended inside a UTF-8 character",
            ));
        }

        let dangling_record = self.record.iter().any(|line| !line.trim().is_empty());
        if dangling_record || !self.line.trim().is_empty() {
            return Err(ProviderError::stream_decode(
                "stream ended with an unterminated frame",
            ));
        }

        self.line.clear();
        self.record.clear();
        self.record_bytes = 0;
        Ok(())
    }

    fn split_lines(&mut self) -> Vec<String> {
        let mut frames = Vec::new();

        while let Some(position) = self.line.find('\n') {
            let mut line: String = self.line.drain(..=position).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            match self.terminator {
                FrameTerminator::Newline => frames.push(line),
                FrameTerminator::BlankLine if line.is_empty() => {
                    if !self.record.is_empty() {
                        frames.push(self.record.join("\n"));
                        self.record.clear();
                        self.record_bytes = 0;
                    }
                }
                FrameTerminator::BlankLine => {
                    self.record_bytes += line.len() + 1;
                    self.record.push(line);
                }
            }
        }

        frames
    }
}
