//! Decoded telemetry record

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use super::{FromValue, PacketSchema, TargetType, Value};

/// One decoded packet: a value per schema field, in schema order.
///
/// The record keeps a handle on the schema it was decoded with, so by-name
/// lookups need no extra context and the record can be encoded back.
#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    schema: Arc<PacketSchema>,
    values: Vec<Value>,
}

impl TelemetryRecord {
    /// Build a record from values aligned with `schema`'s fields.
    pub fn new(schema: Arc<PacketSchema>, values: Vec<Value>) -> crate::Result<Self> {
        if values.len() != schema.len() {
            return Err(crate::TelemetryError::schema_validation_error(format!(
                "Record has {} values but schema declares {} fields",
                values.len(),
                schema.len()
            )));
        }

        for (field, value) in schema.fields().zip(&values) {
            if value.target_type() != field.target_type {
                return Err(crate::TelemetryError::TypeConversion {
                    details: format!(
                        "Field '{}' is {:?}, got {:?}",
                        field.name(),
                        field.target_type,
                        value.target_type()
                    ),
                });
            }
        }

        Ok(Self { schema, values })
    }

    /// Values already checked against the schema by the decoder.
    pub(crate) fn from_decoded(schema: Arc<PacketSchema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), schema.len());
        Self { schema, values }
    }

    /// A record with every numeric field at zero and every flag false.
    pub fn zeroed(schema: Arc<PacketSchema>) -> Self {
        let values = schema
            .fields()
            .map(|field| match field.target_type {
                TargetType::UInt => Value::UInt(0),
                TargetType::Int => Value::Int(0),
                TargetType::Float32 => Value::Float32(0.0),
                TargetType::Bool => Value::Bool(false),
            })
            .collect();
        Self { schema, values }
    }

    /// Replace a field's value. The value must match the declared type.
    pub fn set(&mut self, name: &str, value: Value) -> crate::Result<()> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| crate::TelemetryError::FieldNotFound { field: name.to_string() })?;

        let declared = self.schema.as_slice()[index].target_type;
        if value.target_type() != declared {
            return Err(crate::TelemetryError::TypeConversion {
                details: format!("Field '{}' is {:?}, got {:?}", name, declared, value.target_type()),
            });
        }

        self.values[index] = value;
        Ok(())
    }

    /// Schema this record was decoded with.
    pub fn schema(&self) -> &Arc<PacketSchema> {
        &self.schema
    }

    /// Value by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|index| self.values.get(index))
    }

    /// Value by field position.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All values in schema order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Typed lookup by field name.
    pub fn get_as<T: FromValue>(&self, name: &str) -> crate::Result<T> {
        let value = self
            .get(name)
            .ok_or_else(|| crate::TelemetryError::FieldNotFound { field: name.to_string() })?;
        T::from_value(value)
    }

    /// Convenience typed helpers
    pub fn f32(&self, name: &str) -> Option<f32> {
        self.get_as(name).ok()
    }
    pub fn uint(&self, name: &str) -> Option<u64> {
        self.get_as(name).ok()
    }
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get_as(name).ok()
    }
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get_as(name).ok()
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.fields().map(|field| field.name()).zip(self.values.iter())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bit-identical comparison of two records, NaN payloads included.
    pub fn bit_eq(&self, other: &TelemetryRecord) -> bool {
        self.values.len() == other.values.len()
            && self.iter().zip(other.iter()).all(|((a_name, a), (b_name, b))| {
                a_name == b_name && a.bit_eq(b)
            })
    }
}

impl Serialize for TelemetryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
