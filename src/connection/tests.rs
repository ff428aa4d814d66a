//! Connection tests over in-memory and loopback sources

use super::*;
use crate::adapters::{AdapterValidation, DashPacket, RecordAdapter};
use crate::config::ListenerConfig;
use crate::providers::MemoryProvider;
use crate::schema::dash_schema;
use crate::test_utils::{dash_packet_bytes, rpm_sweep, sample_dash_bytes};
use crate::types::{PacketSchema, TelemetryRecord, UpdateRate};
use crate::TelemetryError;
use futures::StreamExt;
use std::time::Duration;

#[derive(Debug)]
struct Tachometer {
    rpm: f32,
    timestamp_ms: u64,
}

impl RecordAdapter for Tachometer {
    fn validate_schema(schema: &PacketSchema) -> crate::Result<AdapterValidation> {
        Ok(AdapterValidation::builder(schema)
            .required::<f32>("CurrentEngineRpm")?
            .required::<u64>("TimestampMs")?
            .build())
    }

    fn adapt(record: &TelemetryRecord, validation: &AdapterValidation) -> Self {
        Self {
            rpm: validation.fetch_or_default(record, "CurrentEngineRpm"),
            timestamp_ms: validation.fetch_or_default(record, "TimestampMs"),
        }
    }
}

struct NeedsTurbo;

impl RecordAdapter for NeedsTurbo {
    fn validate_schema(schema: &PacketSchema) -> crate::Result<AdapterValidation> {
        Ok(AdapterValidation::builder(schema).required::<f32>("TurboPressure")?.build())
    }

    fn adapt(_record: &TelemetryRecord, _validation: &AdapterValidation) -> Self {
        Self
    }
}

fn sweep_connection(count: usize, rate_hz: f64) -> UdpConnection {
    UdpConnection::from_provider(MemoryProvider::new(rpm_sweep(count)).paced(rate_hz), dash_schema())
}

#[tokio::test(start_paused = true)]
async fn records_stream_delivers_each_paced_packet() {
    let connection = sweep_connection(5, 100.0);

    let rpms: Vec<f32> = connection
        .records()
        .map(|record| record.f32("CurrentEngineRpm").unwrap())
        .collect()
        .await;

    assert_eq!(rpms, vec![1_000.0, 1_100.0, 1_200.0, 1_300.0, 1_400.0]);
}

#[tokio::test(start_paused = true)]
async fn native_subscription_adapts_every_record() {
    let connection = sweep_connection(4, 100.0);
    let stream = connection.subscribe::<Tachometer>(UpdateRate::Native).unwrap();

    let readings: Vec<Tachometer> = stream.collect().await;
    assert_eq!(readings.len(), 4);
    assert_eq!(readings[3].rpm, 1_300.0);
    assert_eq!(readings[3].timestamp_ms, 48);
}

#[tokio::test(start_paused = true)]
async fn max_rate_subscription_samples_without_repeats() {
    let connection = sweep_connection(60, 60.0);
    let stream = connection.subscribe::<Tachometer>(UpdateRate::Max(10)).unwrap();

    let readings: Vec<Tachometer> = stream.collect().await;

    // One second of 60Hz source sampled at 10Hz.
    assert!(!readings.is_empty());
    assert!(readings.len() <= 12, "expected about 10 samples, got {}", readings.len());
    assert!(readings.windows(2).all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms));
}

#[tokio::test(start_paused = true)]
async fn max_rate_at_source_rate_is_native() {
    let connection = sweep_connection(6, 60.0);
    let stream = connection.subscribe::<Tachometer>(UpdateRate::Max(60)).unwrap();
    assert_eq!(stream.count().await, 6);
}

#[tokio::test]
async fn subscribe_rejects_incompatible_adapter() {
    let connection = sweep_connection(1, 60.0);
    let result = connection.subscribe::<NeedsTurbo>(UpdateRate::Native);
    assert!(matches!(result, Err(TelemetryError::FieldNotFound { field }) if field == "TurboPressure"));
}

#[tokio::test(start_paused = true)]
async fn dash_packet_subscription() {
    let provider = MemoryProvider::new([sample_dash_bytes()]).paced(60.0);
    let connection = UdpConnection::from_provider(provider, dash_schema());

    let packets: Vec<DashPacket> =
        connection.subscribe::<DashPacket>(UpdateRate::Native).unwrap().collect().await;
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].current_engine_rpm, 4_500.5);
    assert_eq!(packets[0].gear, 3);
}

#[tokio::test(start_paused = true)]
async fn truncated_packets_are_counted_not_fatal() {
    let full = dash_packet_bytes(|_| {});
    let provider = MemoryProvider::new([full[..16].to_vec(), full.clone(), Vec::new(), full]).paced(100.0);
    let connection = UdpConnection::from_provider(provider, dash_schema());

    assert_eq!(connection.records().count().await, 2);

    let stats = connection.stats();
    assert_eq!(stats.received, 4);
    assert_eq!(stats.decoded, 2);
    assert_eq!(stats.skipped, 2);
}

#[tokio::test(start_paused = true)]
async fn wait_for_first_record_returns_latest() {
    let connection = sweep_connection(3, 10.0);
    let record = connection.wait_for_first_record(Duration::from_secs(1)).await.unwrap();

    assert_eq!(record.f32("CurrentEngineRpm"), Some(1_000.0));
    assert!(connection.latest().is_some());
}

#[tokio::test]
async fn wait_for_first_record_fails_when_source_is_empty() {
    let connection = UdpConnection::from_provider(MemoryProvider::new(Vec::<Vec<u8>>::new()), dash_schema());
    let result = connection.wait_for_first_record(Duration::from_secs(1)).await;
    assert!(matches!(result, Err(TelemetryError::Connection { .. })));
}

#[tokio::test]
async fn bind_times_out_without_traffic() {
    let config = ListenerConfig {
        bind: "127.0.0.1:0".parse().unwrap(),
        first_packet_timeout_ms: Some(50),
        ..Default::default()
    };

    let result = UdpConnection::bind(&config).await;
    assert!(matches!(result, Err(TelemetryError::Timeout { duration }) if duration == Duration::from_millis(50)));
}

#[tokio::test]
async fn bind_reports_resolved_address() {
    let config = ListenerConfig { bind: "127.0.0.1:0".parse().unwrap(), ..Default::default() };
    let connection = UdpConnection::bind(&config).await.unwrap();

    let addr = connection.local_addr().unwrap();
    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
    assert_eq!(connection.source_hz(), 60.0);
    assert!(connection.latest().is_none());
}

#[tokio::test]
async fn dropping_connection_ends_streams() {
    let connection = sweep_connection(100, 1.0);
    let mut records = Box::pin(connection.records());
    let mut sampled = Box::pin(connection.subscribe::<Tachometer>(UpdateRate::Max(1)).unwrap());

    drop(connection);

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        while records.next().await.is_some() {}
        while sampled.next().await.is_some() {}
    })
    .await;
    assert!(ended.is_ok());
}
