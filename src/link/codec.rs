//! Newline-delimited line codec.
//!
//! Wire format (Nordic UART notify characteristic, one JSON object per line):
//! ```text
//! ┌──────────────────────────────┬────┬──────────────────────────┬────┐
//! │ {"heartRate":72,"temp":36.6} │ \n │ {"heartRate":73}         │ \n │ ...
//! └──────────────────────────────┴────┴──────────────────────────┴────┘
//! ```
//!
//! The transport delivers the stream in MTU-sized notifications that carry
//! no record boundaries.  The decoder accumulates bytes and yields every
//! complete line.  A single `feed` call may complete zero, one, or many
//! lines, and the tail after the last separator is kept for the next call.
//!
//! Lines are converted to text only once complete, so a multi-byte UTF-8
//! sequence split across two notifications is reassembled intact.

use heapless::Vec;
use log::warn;

use crate::error::FrameError;

/// Maximum record size (protects against a sender that never emits `\n`).
pub const MAX_LINE_BYTES: usize = 1024;

/// Record separator.
const SEPARATOR: u8 = b'\n';

/// Streaming line decoder.
pub struct LineDecoder {
    /// Bytes received since the last separator.
    buf: Vec<u8, MAX_LINE_BYTES>,
    /// Set after an overflow: drop bytes until the next separator.
    resyncing: bool,
    overflow_count: u32,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            resyncing: false,
            overflow_count: 0,
        }
    }

    /// Feed one transport chunk.
    ///
    /// Returns the complete lines in receipt order (without the separator).
    /// An oversized record shows up as a single `Err` at the position
    /// where it would have been emitted.
    pub fn feed(&mut self, chunk: &[u8]) -> std::vec::Vec<Result<String, FrameError>> {
        let mut out = std::vec::Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == SEPARATOR) {
            self.append(&rest[..pos], &mut out);
            if self.resyncing {
                self.resyncing = false;
            } else {
                out.push(Ok(String::from_utf8_lossy(&self.buf).into_owned()));
            }
            self.buf.clear();
            rest = &rest[pos + 1..];
        }

        self.append(rest, &mut out);
        out
    }

    /// Discard any partial record (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.resyncing = false;
    }

    /// Bytes currently held waiting for a separator.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Number of records discarded for exceeding [`MAX_LINE_BYTES`].
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    fn append(&mut self, segment: &[u8], out: &mut std::vec::Vec<Result<String, FrameError>>) {
        if self.resyncing || segment.is_empty() {
            return;
        }
        if self.buf.extend_from_slice(segment).is_err() {
            warn!(
                "LINK: record exceeds {} bytes without separator, discarding and resyncing",
                MAX_LINE_BYTES
            );
            self.buf.clear();
            self.resyncing = true;
            self.overflow_count += 1;
            out.push(Err(FrameError::LineTooLong {
                limit: MAX_LINE_BYTES,
            }));
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
