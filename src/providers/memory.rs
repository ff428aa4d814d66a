//! In-memory provider for tests and offline replay

use std::collections::VecDeque;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::debug;

use crate::provider::Provider;
use crate::types::RawPacket;
use crate::{Result, TelemetryError};

enum Queued {
    Packet(Vec<u8>),
    Failure(TelemetryError),
}

/// Provider that yields queued datagrams, then ends.
///
/// Queued failures are returned in place, which lets callers exercise the
/// driver's retry path without a socket.
pub struct MemoryProvider {
    queue: VecDeque<Queued>,
    sequence: u64,
    rate_hz: f64,
    pacing: Option<Interval>,
}

impl MemoryProvider {
    /// Queue the given datagrams.
    pub fn new<I, B>(packets: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        Self {
            queue: packets.into_iter().map(|p| Queued::Packet(p.into())).collect(),
            sequence: 0,
            rate_hz: 60.0,
            pacing: None,
        }
    }

    /// Append a datagram.
    pub fn push(&mut self, packet: impl Into<Vec<u8>>) {
        self.queue.push_back(Queued::Packet(packet.into()));
    }

    /// Append a receive failure.
    pub fn push_error(&mut self, error: TelemetryError) {
        self.queue.push_back(Queued::Failure(error));
    }

    /// Release one entry per period at `rate_hz` instead of all at once.
    ///
    /// The end of the queue is reported one period after the last packet.
    pub fn paced(mut self, rate_hz: f64) -> Self {
        let mut ticks = interval(Duration::from_secs_f64(1.0 / rate_hz));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.rate_hz = rate_hz;
        self.pacing = Some(ticks);
        self
    }

    /// Number of queued entries left.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[async_trait::async_trait]
impl Provider for MemoryProvider {
    async fn next_packet(&mut self) -> Result<Option<RawPacket>> {
        if let Some(pacing) = self.pacing.as_mut() {
            pacing.tick().await;
        }

        let Some(next) = self.queue.pop_front() else {
            debug!(delivered = self.sequence, "Memory provider exhausted");
            return Ok(None);
        };

        match next {
            Queued::Packet(bytes) => {
                let packet = RawPacket::new(bytes, self.sequence, None);
                self.sequence += 1;
                Ok(Some(packet))
            }
            Queued::Failure(error) => Err(error),
        }
    }

    fn expected_rate_hz(&self) -> f64 {
        self.rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_packets_then_ends() {
        let mut provider = MemoryProvider::new([vec![1u8, 2], vec![3]]);
        provider.push(vec![4u8]);
        assert_eq!(provider.remaining(), 3);

        let mut seen = Vec::new();
        while let Some(packet) = provider.next_packet().await.unwrap() {
            seen.push((packet.sequence, packet.bytes().to_vec()));
        }

        assert_eq!(seen, vec![(0, vec![1, 2]), (1, vec![3]), (2, vec![4])]);
        assert!(provider.next_packet().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn queued_failures_do_not_consume_sequence_numbers() {
        let mut provider = MemoryProvider::new(Vec::<Vec<u8>>::new());
        provider.push_error(TelemetryError::connection_failed("socket closed"));
        provider.push(vec![7u8]);

        assert!(provider.next_packet().await.is_err());
        let packet = provider.next_packet().await.unwrap().unwrap();
        assert_eq!(packet.sequence, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn paced_provider_reports_rate() {
        let mut provider = MemoryProvider::new(vec![vec![0u8]; 3]).paced(10.0);
        assert_eq!(provider.expected_rate_hz(), 10.0);

        let start = tokio::time::Instant::now();
        for _ in 0..3 {
            provider.next_packet().await.unwrap().unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
