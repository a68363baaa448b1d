//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Newline-delimited line codec

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// Default cap on a single line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Errors produced by [`LineCodec`]
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured length cap
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),

    /// Received bytes were not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// A codec for newline-terminated text lines.
///
/// The decoder accumulates bytes until a `\n` is seen, so a logical line
/// split into arbitrary chunks by the transport is reassembled correctly.
/// One trailing `\r` is stripped. Lines longer than the configured cap are
/// a protocol desynchronization and surface as [`CodecError::LineTooLong`],
/// which terminates the connection's framing.
///
/// The encoder appends `\n` to each reply; partial writes are handled by
/// the surrounding `Framed` transport.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line_length: usize,
    // Offset of the first byte not yet scanned for a terminator, so
    // repeated decode calls do not rescan the buffered prefix.
    next_index: usize,
}

impl LineCodec {
    /// Create a codec with the default line length cap
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with an explicit line length cap
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            next_index: 0,
        }
    }

    fn take_line(&mut self, src: &mut BytesMut, newline_at: usize) -> Result<String, CodecError> {
        let mut line = src.split_to(newline_at + 1);
        self.next_index = 0;
        // Drop the terminator and one optional carriage return.
        line.truncate(line.len() - 1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        String::from_utf8(line.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, CodecError> {
        match src[self.next_index..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let newline_at = self.next_index + offset;
                if newline_at > self.max_line_length {
                    warn!(length = newline_at, "discarding over-long line");
                    return Err(CodecError::LineTooLong(self.max_line_length));
                }
                Ok(Some(self.take_line(src, newline_at)?))
            }
            None => {
                if src.len() > self.max_line_length {
                    return Err(CodecError::LineTooLong(self.max_line_length));
                }
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, CodecError> {
        // A partial line at EOF is a client that went away mid-command;
        // discard it rather than erroring the whole stream.
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), CodecError> {
        Encoder::<&str>::encode(self, item.as_str(), dst)
    }
}

impl Encoder<&str> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), CodecError> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
