//! UDP provider for datagrams sent by the game

use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{info, trace};

use crate::provider::Provider;
use crate::types::RawPacket;
use crate::{Result, TelemetryError};

/// Address the game sends to unless configured otherwise.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9999";

/// Nominal data-out rate of the game.
const DEFAULT_RATE_HZ: f64 = 60.0;

/// Provider that receives datagrams on a bound UDP socket.
///
/// The socket is bound once and reused for every receive. Each datagram is
/// copied out of the receive buffer into its own [`RawPacket`].
pub struct UdpProvider {
    socket: UdpSocket,

    /// Receive buffer, sized to the largest datagram accepted
    buffer: Vec<u8>,

    /// Sequence number for the next packet
    sequence: u64,

    rate_hz: f64,
}

impl UdpProvider {
    /// Bind a UDP socket on `addr` with a `max_packet_size` receive buffer.
    pub async fn bind(addr: SocketAddr, max_packet_size: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            TelemetryError::connection_failed_with_source(format!("Failed to bind UDP socket on {}", addr), Box::new(e))
        })?;

        let local = socket.local_addr()?;
        info!(addr = %local, max_packet_size, "UDP provider bound");

        Ok(Self { socket, buffer: vec![0; max_packet_size], sequence: 0, rate_hz: DEFAULT_RATE_HZ })
    }

    /// Override the expected source rate.
    pub fn with_rate_hz(mut self, rate_hz: f64) -> Self {
        self.rate_hz = rate_hz;
        self
    }

    /// Address the socket is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive buffer size.
    pub fn max_packet_size(&self) -> usize {
        self.buffer.len()
    }
}

#[async_trait::async_trait]
impl Provider for UdpProvider {
    async fn next_packet(&mut self) -> Result<Option<RawPacket>> {
        let (len, source) = self.socket.recv_from(&mut self.buffer).await.map_err(|e| {
            TelemetryError::connection_failed_with_source("UDP receive failed", Box::new(e))
        })?;

        let packet = RawPacket::new(&self.buffer[..len], self.sequence, Some(source));
        trace!(sequence = self.sequence, len, %source, "Datagram received");
        self.sequence += 1;

        Ok(Some(packet))
    }

    fn expected_rate_hz(&self) -> f64 {
        self.rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn loopback_provider() -> UdpProvider {
        UdpProvider::bind("127.0.0.1:0".parse().unwrap(), 64).await.unwrap()
    }

    #[tokio::test]
    async fn receives_owned_copies_in_order() {
        let mut provider = loopback_provider().await;
        let target = provider.local_addr().unwrap();
        assert_ne!(target.port(), 0);

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[1, 2, 3, 4], target).await.unwrap();
        sender.send_to(&[9, 9], target).await.unwrap();

        let first = provider.next_packet().await.unwrap().unwrap();
        let second = provider.next_packet().await.unwrap().unwrap();

        // The second receive reused the buffer; the first packet must not see it.
        assert_eq!(first.bytes(), &[1, 2, 3, 4]);
        assert_eq!(second.bytes(), &[9, 9]);
        assert_eq!((first.sequence, second.sequence), (0, 1));
        assert_eq!(first.source, Some(sender.local_addr().unwrap()));
    }

    #[tokio::test]
    async fn bind_conflict_is_connection_error() {
        let provider = loopback_provider().await;
        let taken = provider.local_addr().unwrap();

        let result = UdpProvider::bind(taken, 64).await;
        assert!(matches!(result, Err(TelemetryError::Connection { .. })));
    }

    #[tokio::test]
    async fn reports_configured_rate() {
        let provider = loopback_provider().await.with_rate_hz(30.0);
        assert_eq!(provider.expected_rate_hz(), 30.0);
        assert_eq!(provider.max_packet_size(), 64);
    }
}
