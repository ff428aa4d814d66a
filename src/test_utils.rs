//! Packet fixtures for tests and benchmarks
//!
//! Fixtures are produced with [`encode`], so they follow whatever the decoder
//! reads and never drift from the dash table.

#![cfg(any(test, feature = "benchmark"))]

use crate::decoder::encode;
use crate::schema::dash_schema;
use crate::types::{TelemetryRecord, Value};

/// A dash record with a handful of representative values set.
///
/// Every other field is zero or false.
pub fn sample_dash_record() -> TelemetryRecord {
    let mut record = TelemetryRecord::zeroed(dash_schema());
    for (name, value) in [
        ("IsRaceOn", Value::Bool(true)),
        ("TimestampMs", Value::UInt(123_456)),
        ("EngineMaxRpm", Value::Float32(8_000.0)),
        ("EngineIdleRpm", Value::Float32(800.0)),
        ("CurrentEngineRpm", Value::Float32(4_500.5)),
        ("Speed", Value::Float32(41.25)),
        ("CarClass", Value::UInt(4)),
        ("CarPerformanceIndex", Value::UInt(255)),
        ("Lap", Value::UInt(7)),
        ("RacePosition", Value::UInt(2)),
        ("Accelerator", Value::UInt(230)),
        ("Gear", Value::UInt(3)),
        ("Steer", Value::Int(200)),
    ] {
        set(&mut record, name, value);
    }
    record
}

/// Encode a zeroed dash record after applying `customize`.
pub fn dash_packet_bytes<F>(customize: F) -> Vec<u8>
where
    F: FnOnce(&mut TelemetryRecord),
{
    let mut record = TelemetryRecord::zeroed(dash_schema());
    customize(&mut record);
    encode(&record).unwrap_or_else(|e| panic!("fixture record does not encode: {e}"))
}

/// Encoded form of [`sample_dash_record`].
pub fn sample_dash_bytes() -> Vec<u8> {
    encode(&sample_dash_record()).unwrap_or_else(|e| panic!("sample record does not encode: {e}"))
}

/// A sequence of dash packets with a climbing engine speed, for stream tests.
pub fn rpm_sweep(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            dash_packet_bytes(|record| {
                set(record, "TimestampMs", Value::UInt(i as u64 * 16));
                set(record, "CurrentEngineRpm", Value::Float32(1_000.0 + i as f32 * 100.0));
            })
        })
        .collect()
}

fn set(record: &mut TelemetryRecord, name: &str, value: Value) {
    record.set(name, value).unwrap_or_else(|e| panic!("fixture field {name}: {e}"));
}
