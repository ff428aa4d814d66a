//! Core types for telemetry data representation.
//!
//! ## Architecture
//!
//! - [`FieldDescriptor`] says where one field lives in a packet and what it decodes to
//! - [`PacketSchema`] is a validated, ordered list of descriptors with O(1) name lookup
//! - [`TargetType`] is the semantic type tag; [`Value`] is a decoded value of that type
//! - [`TelemetryRecord`] holds one decoded packet, in schema order
//! - [`RawPacket`] is an owned datagram payload handed from a provider to the decoder
//! - [`FromValue`] provides typed reads out of decoded values
//!
//! ## Usage Example
//!
//! ```rust
//! use fh_telemetry::types::{FieldDescriptor, PacketSchema, TargetType};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(
//!     PacketSchema::new(
//!         vec![
//!             FieldDescriptor::new("CurrentEngineRpm", 0, 4, TargetType::Float32),
//!             FieldDescriptor::new("Gear", 4, 1, TargetType::UInt),
//!         ],
//!         5,
//!     )
//!     .unwrap(),
//! );
//!
//! let mut data = 4500.0f32.to_le_bytes().to_vec();
//! data.push(3);
//!
//! let record = fh_telemetry::decode(&data, &schema).unwrap();
//! assert_eq!(record.f32("CurrentEngineRpm"), Some(4500.0));
//! assert_eq!(record.uint("Gear"), Some(3));
//! ```

mod descriptor;
mod from_value;
mod packet;
mod record;
mod schema;
mod target_type;
mod update_rate;

// Re-export all public types
pub use descriptor::{DEFAULT_FIELD_LENGTH, FieldDescriptor};
pub use from_value::FromValue;
pub use packet::RawPacket;
pub use record::TelemetryRecord;
pub use schema::PacketSchema;
pub use target_type::{TargetType, Value};
pub use update_rate::UpdateRate;
