//! End-to-end decoding over a loopback UDP socket.

use fh_telemetry::schema::{DASH_PACKET_SIZE, dash_schema};
use fh_telemetry::types::{TelemetryRecord, Value};
use fh_telemetry::{DashPacket, ListenerConfig, Telemetry, TelemetryError, UpdateRate, encode};
use futures::StreamExt;
use std::time::Duration;
use tokio::net::UdpSocket;

fn dash_bytes(rpm: f32, gear: u64) -> Vec<u8> {
    let mut record = TelemetryRecord::zeroed(dash_schema());
    record.set("IsRaceOn", Value::Bool(true)).unwrap();
    record.set("CurrentEngineRpm", Value::Float32(rpm)).unwrap();
    record.set("Gear", Value::UInt(gear)).unwrap();
    encode(&record).unwrap()
}

fn loopback_config() -> ListenerConfig {
    ListenerConfig { bind: "127.0.0.1:0".parse().unwrap(), ..Default::default() }
}

#[tokio::test]
async fn datagram_is_decoded_and_published() {
    let connection = Telemetry::listen(&loopback_config()).await.unwrap();
    let target = connection.local_addr().unwrap();
    let mut records = Box::pin(connection.records());

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(&dash_bytes(6_250.0, 4), target).await.unwrap();

    let record = tokio::time::timeout(Duration::from_secs(5), records.next()).await.unwrap().unwrap();
    assert_eq!(record.bool("IsRaceOn"), Some(true));
    assert_eq!(record.f32("CurrentEngineRpm"), Some(6_250.0));
    assert_eq!(record.uint("Gear"), Some(4));
}

#[tokio::test]
async fn truncated_datagram_does_not_stop_listener() {
    let connection = Telemetry::listen(&loopback_config()).await.unwrap();
    let target = connection.local_addr().unwrap();
    let mut packets = Box::pin(connection.subscribe::<DashPacket>(UpdateRate::Native).unwrap());

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let full = dash_bytes(3_000.0, 2);
    sender.send_to(&full[..DASH_PACKET_SIZE / 2], target).await.unwrap();
    sender.send_to(&full, target).await.unwrap();

    let packet = tokio::time::timeout(Duration::from_secs(5), packets.next()).await.unwrap().unwrap();
    assert_eq!(packet.current_engine_rpm, 3_000.0);
    assert_eq!(packet.gear, 2);

    let stats = connection.stats();
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.decoded, 1);
}

#[tokio::test]
async fn packet_without_padding_byte_still_decodes() {
    let connection = Telemetry::listen(&loopback_config()).await.unwrap();
    let target = connection.local_addr().unwrap();
    let mut records = Box::pin(connection.records());

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let full = dash_bytes(900.0, 1);
    sender.send_to(&full[..dash_schema().required_len()], target).await.unwrap();

    let record = tokio::time::timeout(Duration::from_secs(5), records.next()).await.unwrap().unwrap();
    assert_eq!(record.f32("CurrentEngineRpm"), Some(900.0));
}

#[tokio::test]
async fn first_packet_wait_succeeds_when_game_is_sending() {
    let probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);

    let config = ListenerConfig { bind: addr, first_packet_timeout_ms: Some(5_000), ..Default::default() };

    let sender = tokio::spawn(async move {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bytes = dash_bytes(1_234.0, 1);
        for _ in 0..100 {
            socket.send_to(&bytes, addr).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    let connection = Telemetry::listen(&config).await.unwrap();
    assert_eq!(connection.latest().unwrap().f32("CurrentEngineRpm"), Some(1_234.0));
    sender.abort();
}

#[tokio::test]
async fn undersized_receive_buffer_is_rejected() {
    let config = ListenerConfig { max_packet_size: 64, ..loopback_config() };
    let result = Telemetry::listen(&config).await;
    assert!(matches!(result, Err(TelemetryError::SchemaValidation { .. })));
}
