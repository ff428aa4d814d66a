//! Schema-driven packet decoding.
//!
//! Every field is read the same way: slice `[offset, offset + length)`, then
//! interpret the bytes according to the field's width and target type.
//!
//! | Length | Target | Result |
//! |--------|--------|--------|
//! | 1 | `UInt` / `Int` | the byte as a 0-255 magnitude (no sign extension) |
//! | 2 | `UInt` | little-endian `u16` |
//! | 4 | `Float32` | little-endian bits reinterpreted as `f32` |
//! | 4 | `UInt` / `Int` | that `f32` truncated toward zero (saturating) |
//! | 4 | `Bool` | `false` only when that `f32` is exactly zero |
//!
//! Any other pair is [`UnsupportedFieldSpec`](crate::TelemetryError::UnsupportedFieldSpec).
//! [`PacketSchema::new`] already refuses such descriptors, so in practice the
//! only per-packet failure is [`OutOfBounds`](crate::TelemetryError::OutOfBounds).
//!
//! Decoding is pure: no I/O, no shared state, and the same bytes always give
//! a bit-identical record. Calls may run concurrently on independent buffers.

use std::sync::Arc;

use crate::types::{FieldDescriptor, PacketSchema, TargetType, TelemetryRecord, Value};
use crate::{Result, TelemetryError};

/// Decode `buffer` into a record laid out by `schema`.
///
/// Fields are visited in schema order and bounds-checked one by one, so a
/// truncated packet fails on the first field it cannot satisfy.
pub fn decode(buffer: &[u8], schema: &Arc<PacketSchema>) -> Result<TelemetryRecord> {
    let values =
        schema.fields().map(|field| decode_field(buffer, field)).collect::<Result<Vec<_>>>()?;

    Ok(TelemetryRecord::from_decoded(Arc::clone(schema), values))
}

/// Decode a single field from `buffer`.
pub fn decode_field(buffer: &[u8], field: &FieldDescriptor) -> Result<Value> {
    let bytes = buffer.get(field.offset..field.end()).ok_or_else(|| {
        TelemetryError::out_of_bounds(field.name(), field.offset, field.length, buffer.len())
    })?;

    match (bytes, field.target_type) {
        (&[byte], TargetType::UInt) => Ok(Value::UInt(u64::from(byte))),
        // Unsigned magnitude; the dash format's steer byte is read without sign extension.
        (&[byte], TargetType::Int) => Ok(Value::Int(i64::from(byte))),
        (&[b0, b1], TargetType::UInt) => Ok(Value::UInt(u64::from(u16::from_le_bytes([b0, b1])))),
        (&[b0, b1, b2, b3], target) => {
            let float = f32::from_bits(u32::from_le_bytes([b0, b1, b2, b3]));
            Ok(match target {
                TargetType::Float32 => Value::Float32(float),
                TargetType::UInt => Value::UInt(float as u64),
                TargetType::Int => Value::Int(float as i64),
                TargetType::Bool => Value::Bool(float != 0.0),
            })
        }
        _ => Err(TelemetryError::unsupported_field_spec(
            field.name(),
            field.length,
            field.target_type,
        )),
    }
}

/// Encode `record` back into a packet-sized buffer.
///
/// Bytes not covered by any field are zero. 4-byte integer and flag fields
/// are written as float bit patterns, so decoding the result reproduces the
/// record for every value an `f32` can represent exactly.
pub fn encode(record: &TelemetryRecord) -> Result<Vec<u8>> {
    let schema = record.schema();
    let mut buffer = vec![0u8; schema.packet_size()];

    for (field, value) in schema.fields().zip(record.values()) {
        let target = &mut buffer[field.offset..field.end()];
        encode_field(field, value, target)?;
    }

    Ok(buffer)
}

fn encode_field(field: &FieldDescriptor, value: &Value, target: &mut [u8]) -> Result<()> {
    let out_of_range = |value: String| TelemetryError::TypeConversion {
        details: format!(
            "Value {} does not fit field '{}' ({} bytes, {:?})",
            value,
            field.name(),
            field.length,
            field.target_type
        ),
    };

    match (field.length, value) {
        (1, Value::UInt(v)) => {
            target[0] = u8::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
        }
        (1, Value::Int(v)) => {
            target[0] = u8::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
        }
        (2, Value::UInt(v)) => {
            let word = u16::try_from(*v).map_err(|_| out_of_range(v.to_string()))?;
            target.copy_from_slice(&word.to_le_bytes());
        }
        (4, Value::Float32(v)) => target.copy_from_slice(&v.to_le_bytes()),
        (4, Value::UInt(v)) => target.copy_from_slice(&(*v as f32).to_le_bytes()),
        (4, Value::Int(v)) => target.copy_from_slice(&(*v as f32).to_le_bytes()),
        (4, Value::Bool(v)) => {
            let flag: f32 = if *v { 1.0 } else { 0.0 };
            target.copy_from_slice(&flag.to_le_bytes());
        }
        _ => {
            return Err(TelemetryError::unsupported_field_spec(
                field.name(),
                field.length,
                value.target_type(),
            ));
        }
    }

    Ok(())
}
