//! Raw datagram payloads handed from a provider to the decoder

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// One received datagram.
///
/// The payload is an exclusively-owned copy of the bytes the transport
/// delivered, so the receive buffer can be reused for the next datagram while
/// this one is still being decoded.
#[derive(Debug, Clone)]
pub struct RawPacket {
    /// Datagram payload (shared read-only via Arc)
    pub data: Arc<[u8]>,

    /// Receive order assigned by the provider, starting at 0
    pub sequence: u64,

    /// Sender address, when the transport knows it
    pub source: Option<SocketAddr>,

    /// When the datagram was received
    pub received_at: Instant,
}

impl RawPacket {
    /// Create a packet from received bytes.
    pub fn new(data: impl Into<Arc<[u8]>>, sequence: u64, source: Option<SocketAddr>) -> Self {
        Self { data: data.into(), sequence, source, received_at: Instant::now() }
    }

    /// Payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Payload length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the datagram was empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
