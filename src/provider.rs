//! Provider trait for packet sources

use super::types::RawPacket;
use crate::Result;

/// Trait for telemetry byte sources.
///
/// A provider only delivers datagrams; decoding happens in the driver. Each
/// returned packet owns its bytes, so the provider is free to reuse its
/// receive buffer for the next call.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Wait for the next datagram.
    ///
    /// Returns:
    /// - `Ok(Some(packet))` - New datagram available
    /// - `Ok(None)` - Source exhausted (normal termination)
    /// - `Err(e)` - Receive failed; the driver may retry
    async fn next_packet(&mut self) -> Result<Option<RawPacket>>;

    /// Nominal packet rate of the source in Hz.
    fn expected_rate_hz(&self) -> f64;
}
