//! Typed adapters from decoded records to Rust structs.
//!
//! Adapters run in two phases:
//! - **Subscription time**: [`RecordAdapter::validate_schema`] resolves every field
//!   name against the schema, checks its type, and builds an [`AdapterValidation`]
//! - **Per record**: [`RecordAdapter::adapt`] reads values by position using the plan
//!
//! A schema that lacks a required field is rejected before any packet is read.
//!
//! # Example
//!
//! ```rust
//! use fh_telemetry::adapters::{AdapterValidation, RecordAdapter};
//! use fh_telemetry::schema::dash_schema;
//! use fh_telemetry::types::{PacketSchema, TelemetryRecord};
//!
//! struct Revs {
//!     rpm: f32,
//!     gear: u8,
//!     boost: Option<f32>,
//! }
//!
//! impl RecordAdapter for Revs {
//!     fn validate_schema(schema: &PacketSchema) -> fh_telemetry::Result<AdapterValidation> {
//!         Ok(AdapterValidation::builder(schema)
//!             .required::<f32>("CurrentEngineRpm")?
//!             .required::<u8>("Gear")?
//!             .optional::<f32>("Boost")?
//!             .build())
//!     }
//!
//!     fn adapt(record: &TelemetryRecord, validation: &AdapterValidation) -> Self {
//!         Self {
//!             rpm: validation.fetch_or_default(record, "CurrentEngineRpm"),
//!             gear: validation.fetch_or_default(record, "Gear"),
//!             boost: validation.fetch(record, "Boost"),
//!         }
//!     }
//! }
//!
//! let schema = dash_schema();
//! let validation = Revs::validate_schema(&schema).unwrap();
//! let revs = Revs::adapt(&TelemetryRecord::zeroed(schema), &validation);
//! assert_eq!(revs.rpm, 0.0);
//! assert_eq!(revs.gear, 0);
//! assert_eq!(revs.boost, Some(0.0));
//! ```

mod dash_packet;
mod record_adapter;
mod validation;

pub use dash_packet::DashPacket;
pub use record_adapter::RecordAdapter;
pub use validation::{AdapterValidation, AdapterValidationBuilder, FieldExtraction};
