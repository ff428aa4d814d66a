//! Record adapter trait for typed telemetry extraction

use crate::types::{PacketSchema, TelemetryRecord};

use super::AdapterValidation;

/// Two-phase adapter from decoded records to a typed struct.
///
/// `validate_schema()` runs once per subscription and may do name lookups and
/// type checks; `adapt()` runs per record (60Hz) using only the positions
/// resolved up front.
pub trait RecordAdapter: Sized {
    /// Validate the adapter against a packet schema and build its extraction plan.
    fn validate_schema(schema: &PacketSchema) -> crate::Result<AdapterValidation>;

    /// Build `Self` from one record using the pre-validated plan.
    fn adapt(record: &TelemetryRecord, validation: &AdapterValidation) -> Self;
}
