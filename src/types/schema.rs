//! Packet schema type

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::FieldDescriptor;

/// Ordered, validated layout of a telemetry packet.
///
/// A schema is built once, checked once and then shared read-only (usually
/// behind an `Arc`) by every decode call. Field order is the order values
/// appear in a decoded [`TelemetryRecord`](super::TelemetryRecord).
#[derive(Debug, Clone, Serialize)]
pub struct PacketSchema {
    /// Declared size of a packet in bytes
    packet_size: usize,
    /// Field descriptors in declaration order
    fields: Vec<FieldDescriptor>,
    /// Field name to position in `fields` (O(1) lookup)
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PacketSchema {
    /// Create a new schema with validation.
    ///
    /// Fails with [`UnsupportedFieldSpec`](crate::TelemetryError::UnsupportedFieldSpec)
    /// for a length/type pair the decoder cannot handle, and with
    /// [`SchemaValidation`](crate::TelemetryError::SchemaValidation) for duplicate
    /// names or fields reaching past `packet_size`.
    pub fn new(fields: Vec<FieldDescriptor>, packet_size: usize) -> crate::Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            if !field.is_supported() {
                return Err(crate::TelemetryError::unsupported_field_spec(
                    field.name(),
                    field.length,
                    field.target_type,
                ));
            }

            if field.end() > packet_size {
                return Err(crate::TelemetryError::schema_validation_error(format!(
                    "Field '{}' ends at byte {} but packets are {} bytes",
                    field.name(),
                    field.end(),
                    packet_size
                )));
            }

            if index.insert(field.name().to_string(), position).is_some() {
                return Err(crate::TelemetryError::schema_validation_error(format!(
                    "Duplicate field name '{}'",
                    field.name()
                )));
            }
        }

        debug!(field_count = fields.len(), packet_size, "Packet schema validated");

        Ok(Self { packet_size, fields, index })
    }

    /// Iterate field descriptors in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Field descriptors as a slice.
    pub fn as_slice(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Declared packet size in bytes.
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    /// Smallest buffer that satisfies every field.
    pub fn required_len(&self) -> usize {
        self.fields.iter().map(FieldDescriptor::end).max().unwrap_or(0)
    }

    /// Get a field descriptor by name (O(1) lookup).
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index_of(name).map(|position| &self.fields[position])
    }

    /// Position of a field within the schema.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
