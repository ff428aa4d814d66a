//! Validation types and field extraction strategies for adapters

use std::collections::HashMap;

use crate::types::{FromValue, PacketSchema, TelemetryRecord};
use crate::{Result, TelemetryError};

/// Pre-computed extraction plan built once per subscription.
///
/// Maps adapter field names to record positions so `adapt()` never searches
/// the schema.
#[derive(Debug, Clone)]
pub struct AdapterValidation {
    /// Ordered list of field extraction operations
    pub extraction_plan: Vec<FieldExtraction>,
    /// Fast lookup from telemetry field name to extraction index
    index_map: HashMap<String, usize>,
}

impl AdapterValidation {
    /// Create a new validation plan with the given extraction operations.
    pub fn new(extraction_plan: Vec<FieldExtraction>) -> Self {
        let index_map = extraction_plan
            .iter()
            .enumerate()
            .map(|(index, extraction)| (extraction.field_name().to_string(), index))
            .collect();

        Self { extraction_plan, index_map }
    }

    /// Start building a plan against `schema`.
    pub fn builder(schema: &PacketSchema) -> AdapterValidationBuilder<'_> {
        AdapterValidationBuilder { schema, plan: Vec::new() }
    }

    /// Get the number of fields that will be extracted.
    pub fn field_count(&self) -> usize {
        self.extraction_plan.len()
    }

    /// Check if the validation plan contains any required fields.
    pub fn has_required_fields(&self) -> bool {
        self.extraction_plan.iter().any(FieldExtraction::is_required)
    }

    /// Lookup the extraction index for a telemetry field name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_map.get(name).copied()
    }

    /// Read a value through the plan, or `None` when the field was not mapped.
    pub fn fetch<T: FromValue>(&self, record: &TelemetryRecord, name: &str) -> Option<T> {
        let position = self.extraction_plan.get(self.index_of(name)?)?.record_index()?;
        record.value_at(position).and_then(|value| T::from_value(value).ok())
    }

    /// Read the value mapped by the `slot`-th plan entry.
    pub fn fetch_at<T: FromValue>(&self, record: &TelemetryRecord, slot: usize) -> Option<T> {
        let position = self.extraction_plan.get(slot)?.record_index()?;
        record.value_at(position).and_then(|value| T::from_value(value).ok())
    }

    /// Read a value through the plan, falling back to `T::default()`.
    pub fn fetch_or_default<T>(&self, record: &TelemetryRecord, name: &str) -> T
    where
        T: FromValue + Default,
    {
        self.fetch(record, name).unwrap_or_default()
    }
}

/// Extraction strategy for a single adapter field.
#[derive(Debug, Clone)]
pub enum FieldExtraction {
    /// Field that must exist in the schema; validation fails otherwise.
    Required {
        /// Field name in the packet schema
        name: String,
        /// Position of the field's value in a decoded record
        record_index: usize,
    },

    /// Field that may be absent from the schema.
    Optional {
        /// Field name in the packet schema
        name: String,
        /// Position if the field exists
        record_index: Option<usize>,
    },
}

impl FieldExtraction {
    /// Telemetry field name.
    pub fn field_name(&self) -> &str {
        match self {
            FieldExtraction::Required { name, .. } | FieldExtraction::Optional { name, .. } => name,
        }
    }

    /// Check if this field must exist in the schema.
    pub fn is_required(&self) -> bool {
        matches!(self, FieldExtraction::Required { .. })
    }

    /// Record position, if the field is mapped.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            FieldExtraction::Required { record_index, .. } => Some(*record_index),
            FieldExtraction::Optional { record_index, .. } => *record_index,
        }
    }
}

/// Builds an [`AdapterValidation`], checking names and types as it goes.
pub struct AdapterValidationBuilder<'a> {
    schema: &'a PacketSchema,
    plan: Vec<FieldExtraction>,
}

impl AdapterValidationBuilder<'_> {
    /// Map a field that must exist and be readable as `T`.
    pub fn required<T: FromValue>(mut self, name: &str) -> Result<Self> {
        let record_index = self.checked_index::<T>(name)?.ok_or_else(|| {
            TelemetryError::FieldNotFound { field: name.to_string() }
        })?;
        self.plan.push(FieldExtraction::Required { name: name.to_string(), record_index });
        Ok(self)
    }

    /// Map a field that may be missing. A present field of the wrong type is
    /// still an error.
    pub fn optional<T: FromValue>(mut self, name: &str) -> Result<Self> {
        let record_index = self.checked_index::<T>(name)?;
        self.plan.push(FieldExtraction::Optional { name: name.to_string(), record_index });
        Ok(self)
    }

    /// Finish the plan.
    pub fn build(self) -> AdapterValidation {
        AdapterValidation::new(self.plan)
    }

    fn checked_index<T: FromValue>(&self, name: &str) -> Result<Option<usize>> {
        let Some(index) = self.schema.index_of(name) else {
            return Ok(None);
        };

        let field = &self.schema.as_slice()[index];
        if !T::accepts(field.target_type, field.length) {
            return Err(TelemetryError::TypeConversion {
                details: format!(
                    "Field '{}' is declared {}-byte {:?} and cannot be read as {}",
                    name,
                    field.length,
                    field.target_type,
                    std::any::type_name::<T>()
                ),
            });
        }

        Ok(Some(index))
    }
}
