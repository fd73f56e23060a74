//! Transport abstraction: any byte source that delivers telemetry chunks.
//!
//! Concrete implementations:
//! - BLE UART notify characteristic (on the phone/gateway side)
//! - [`ReplayTransport`]: a recorded capture replayed in MTU-sized chunks
//!
//! The session never sees the transport; the owner reads chunks and feeds
//! them in, so adding a new transport requires no changes to the pipeline.

/// BLE ATT payload with the default 23-byte MTU (MTU − 3-byte header).
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Byte-oriented receive channel.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 once the peer has disconnected and no data remains.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    fn is_connected(&self) -> bool;
}

/// Replays a byte capture, never returning more than `chunk_size` bytes
/// per read (mimicking notification fragmentation).
pub struct ReplayTransport {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
}

impl ReplayTransport {
    pub fn new(data: Vec<u8>, chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl Transport for ReplayTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.remaining().min(self.chunk_size).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn is_connected(&self) -> bool {
        self.remaining() > 0
    }
}
