//! UDP connection for live game telemetry

use futures::{Stream, StreamExt, stream};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ListenerConfig;
use crate::driver::{Driver, DriverStats};
use crate::provider::Provider;
use crate::providers::UdpProvider;
use crate::types::{PacketSchema, TelemetryRecord, UpdateRate};
use crate::{RecordAdapter, Result, TelemetryError};

type RecordReceiver = watch::Receiver<Option<Arc<TelemetryRecord>>>;

/// Live connection to a game sending dash telemetry.
///
/// Dropping the connection stops the receive task and closes every stream
/// handed out by it.
pub struct UdpConnection {
    /// Latest record receiver
    records: RecordReceiver,

    /// Driver counters
    stats: watch::Receiver<DriverStats>,

    /// Schema records are decoded with
    schema: Arc<PacketSchema>,

    /// Expected packet rate
    source_hz: f64,

    /// Bound socket address, for UDP sources
    local_addr: Option<SocketAddr>,

    /// Cancellation token for stopping the driver
    cancel: CancellationToken,
}

impl UdpConnection {
    /// Bind a UDP socket as configured and start decoding.
    ///
    /// With `first_packet_timeout_ms` set, waits for the first decoded record
    /// and fails with [`TelemetryError::Timeout`] if none arrives.
    pub async fn bind(config: &ListenerConfig) -> Result<Self> {
        config.validate()?;
        let schema = config.load_schema()?;

        let provider = UdpProvider::bind(config.bind, config.max_packet_size).await?.with_rate_hz(config.rate_hz);
        let local_addr = provider.local_addr()?;

        let mut connection = Self::from_provider(provider, schema);
        connection.local_addr = Some(local_addr);

        if let Some(timeout) = config.first_packet_timeout() {
            connection.wait_for_first_record(timeout).await?;
        }

        info!(addr = %local_addr, rate_hz = config.rate_hz, "UDP connection ready");
        Ok(connection)
    }

    /// Start decoding packets from any provider.
    pub fn from_provider<P: Provider>(provider: P, schema: Arc<PacketSchema>) -> Self {
        let source_hz = provider.expected_rate_hz();
        let channels = Driver::spawn(provider, Arc::clone(&schema));

        Self {
            records: channels.records,
            stats: channels.stats,
            schema,
            source_hz,
            local_addr: None,
            cancel: channels.cancel,
        }
    }

    /// Wait until a record has been decoded.
    pub async fn wait_for_first_record(&self, timeout: Duration) -> Result<Arc<TelemetryRecord>> {
        let mut records = self.records.clone();
        let wait = async move {
            loop {
                let latest = records.borrow_and_update().clone();
                if let Some(record) = latest {
                    return Ok(record);
                }
                if records.changed().await.is_err() {
                    return Err(TelemetryError::connection_failed("Source ended before the first record"));
                }
            }
        };

        tokio::time::timeout(timeout, wait).await.map_err(|_| TelemetryError::Timeout { duration: timeout })?
    }

    /// Every decoded record, latest-wins for slow consumers.
    ///
    /// The stream ends when the source ends or the connection is dropped.
    pub fn records(&self) -> impl Stream<Item = Arc<TelemetryRecord>> + Send + 'static {
        WatchStream::new(self.records.clone()).filter_map(|opt| async move { opt })
    }

    /// Subscribe to records adapted to `T`.
    ///
    /// The adapter is validated against the connection's schema once, here.
    /// `UpdateRate::Max` samples the latest record on a fixed period and skips
    /// periods in which nothing new arrived.
    pub fn subscribe<T>(&self, rate: UpdateRate) -> Result<impl Stream<Item = T> + Send + 'static>
    where
        T: RecordAdapter + Send + 'static,
    {
        let validation = T::validate_schema(&self.schema)?;
        debug!(fields = validation.field_count(), adapter = std::any::type_name::<T>(), "Adapter validated");

        let stream = match rate.sample_interval(self.source_hz) {
            None => self.records().map(move |record| T::adapt(&record, &validation)).boxed(),
            Some(period) => sample_latest(self.records.clone(), period)
                .map(move |record| T::adapt(&record, &validation))
                .boxed(),
        };

        Ok(stream)
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<Arc<TelemetryRecord>> {
        self.records.borrow().clone()
    }

    /// Receive counters so far.
    pub fn stats(&self) -> DriverStats {
        *self.stats.borrow()
    }

    /// Schema records are decoded with.
    pub fn schema(&self) -> &Arc<PacketSchema> {
        &self.schema
    }

    /// Expected packet rate in Hz.
    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Bound socket address, when the source is a UDP socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

impl Drop for UdpConnection {
    fn drop(&mut self) {
        debug!("Dropping UDP connection");
        self.cancel.cancel();
    }
}

/// Emit the latest record once per `period`, skipping repeats.
fn sample_latest(
    records: RecordReceiver,
    period: Duration,
) -> impl Stream<Item = Arc<TelemetryRecord>> + Send + 'static {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    stream::unfold((records, ticker, None::<Arc<TelemetryRecord>>), |(records, mut ticker, last)| async move {
        loop {
            ticker.tick().await;

            let latest = records.borrow().clone();
            match latest {
                Some(record) if !last.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &record)) => {
                    return Some((Arc::clone(&record), (records, ticker, Some(record))));
                }
                _ if records.has_changed().is_err() => return None,
                _ => {}
            }
        }
    })
}
