//! Driver spawns and manages the receive/decode task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use super::provider::Provider;
use super::types::{PacketSchema, TelemetryRecord};
use crate::decoder::decode;

/// Consecutive provider failures tolerated before the task gives up.
const MAX_ERRORS: u32 = 10;

/// Running counters for one driver task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Datagrams handed over by the provider
    pub received: u64,
    /// Datagrams decoded and published
    pub decoded: u64,
    /// Datagrams dropped because they failed to decode
    pub skipped: u64,
    /// Provider failures seen so far
    pub provider_errors: u64,
}

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Latest decoded record; `None` before the first packet and after the source ends
    pub records: watch::Receiver<Option<Arc<TelemetryRecord>>>,
    /// Counters, updated after every datagram
    pub stats: watch::Receiver<DriverStats>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver owns a provider and turns its datagrams into published records.
///
/// Only the latest record is kept: a slow consumer sees the newest packet, not
/// a backlog.
pub struct Driver;

impl Driver {
    /// Spawn the receive task for `provider`, decoding with `schema`.
    pub fn spawn<P>(provider: P, schema: Arc<PacketSchema>) -> DriverChannels
    where
        P: Provider,
    {
        let (record_tx, record_rx) = watch::channel(None);
        let (stats_tx, stats_rx) = watch::channel(DriverStats::default());
        let cancel = CancellationToken::new();

        let cancel_task = cancel.clone();
        tokio::spawn(async move {
            Self::receive_task(provider, schema, record_tx, stats_tx, cancel_task).await;
        });

        DriverChannels { records: record_rx, stats: stats_rx, cancel }
    }

    async fn receive_task<P>(
        mut provider: P,
        schema: Arc<PacketSchema>,
        record_tx: watch::Sender<Option<Arc<TelemetryRecord>>>,
        stats_tx: watch::Sender<DriverStats>,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!(fields = schema.len(), "Receive task started");
        let mut error_count = 0u32;

        loop {
            if cancel.is_cancelled() {
                info!("Receive task cancelled");
                break;
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Receive task cancelled");
                    break;
                }
                result = provider.next_packet() => result,
            };

            match result {
                Ok(Some(packet)) => {
                    error_count = 0;
                    stats_tx.send_modify(|stats| stats.received += 1);

                    match decode(packet.bytes(), &schema) {
                        Ok(record) => {
                            trace!(sequence = packet.sequence, len = packet.len(), "Packet decoded");
                            stats_tx.send_modify(|stats| stats.decoded += 1);

                            if record_tx.send(Some(Arc::new(record))).is_err() {
                                debug!("Record receiver dropped, shutting down");
                                break;
                            }
                        }
                        Err(e) => {
                            debug!(sequence = packet.sequence, len = packet.len(), error = %e, "Packet skipped");
                            stats_tx.send_modify(|stats| stats.skipped += 1);
                        }
                    }
                }
                Ok(None) => {
                    info!("Provider ended");
                    let _ = record_tx.send(None);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    stats_tx.send_modify(|stats| stats.provider_errors += 1);
                    error!("Provider error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        let _ = record_tx.send(None);
                        break;
                    }

                    // 100ms, 200ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        let stats = *stats_tx.borrow();
        info!(
            received = stats.received,
            decoded = stats.decoded,
            skipped = stats.skipped,
            "Receive task ended"
        );
    }
}
