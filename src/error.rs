//! Error types for telemetry decoding and ingest.
//!
//! All errors implement `std::error::Error` and carry enough structured context
//! to tell a malformed packet apart from a broken schema or a transport fault.
//!
//! ## Error Categories
//!
//! - **Packet Errors**: a datagram too short for a declared field ([`TelemetryError::OutOfBounds`])
//! - **Schema Errors**: unsupported descriptors, duplicate names, fields past the packet end
//! - **Type Errors**: lookups or encodes that do not match a field's declared type
//! - **Transport Errors**: bind and receive failures on the UDP socket
//! - **Configuration Errors**: unreadable or malformed config and schema files
//!
//! ## Recovery and Retry
//!
//! Packet errors are per-datagram and never stop the ingest loop. Schema errors
//! are static defects and surface once, when the schema is built:
//!
//! ```rust
//! use fh_telemetry::TelemetryError;
//!
//! let error = TelemetryError::out_of_bounds("Lap", 312, 2, 100);
//! assert!(error.is_packet_error());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::types::TargetType;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error(
        "Field '{field}' at offset {offset} (length {length}) is out of bounds for a {buffer_len}-byte packet"
    )]
    OutOfBounds { field: String, offset: usize, length: usize, buffer_len: usize },

    #[error("Field '{field}' declares unsupported length {length} for target type {target_type:?}")]
    UnsupportedFieldSpec { field: String, length: usize, target_type: TargetType },

    #[error("Schema validation failed: {reason}")]
    SchemaValidation { reason: String },

    #[error("Field '{field}' not found in telemetry schema")]
    FieldNotFound { field: String },

    #[error("Type conversion error: {details}")]
    TypeConversion { details: String },

    #[error("UDP transport error: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Connection { .. } => true,
            TelemetryError::Timeout { .. } => true,
            TelemetryError::OutOfBounds { .. } => false,
            TelemetryError::UnsupportedFieldSpec { .. } => false,
            TelemetryError::SchemaValidation { .. } => false,
            TelemetryError::FieldNotFound { .. } => false,
            TelemetryError::TypeConversion { .. } => false,
            TelemetryError::File { .. } => false,
            TelemetryError::Parse { .. } => false,
        }
    }

    /// Returns whether this error concerns a single packet rather than the
    /// schema or the transport. The ingest loop skips such packets.
    pub fn is_packet_error(&self) -> bool {
        matches!(self, TelemetryError::OutOfBounds { .. })
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::OutOfBounds { .. } => vec![
                "Check the game is sending the dash packet format",
                "Verify the receive buffer is at least the schema's required length",
                "Ignore the packet; datagrams may arrive truncated",
            ],
            TelemetryError::UnsupportedFieldSpec { .. } => vec![
                "Use a length of 1, 2 or 4 bytes",
                "Declare 2-byte fields as uint",
                "Declare 1-byte fields as uint or int",
            ],
            TelemetryError::SchemaValidation { .. } => vec![
                "Give every field a unique name",
                "Keep offset + length within packet_size",
                "Encode records with the schema they were decoded with",
            ],
            TelemetryError::FieldNotFound { .. } => vec![
                "Check field name spelling",
                "Verify the field exists in the active schema",
                "Use optional field access patterns",
            ],
            TelemetryError::TypeConversion { .. } => vec![
                "Check the field's declared target type",
                "Verify the value fits the field's byte length",
                "Use the typed accessor matching the target type",
            ],
            TelemetryError::Connection { .. } => vec![
                "Check no other process is bound to the port",
                "Verify the bind address exists on this host",
                "Enable data out in the game's HUD settings",
            ],
            TelemetryError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            TelemetryError::Parse { .. } => vec![
                "Check the YAML syntax",
                "Verify keys and value types against the documented format",
                "Check environment variable values",
            ],
            TelemetryError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Verify the game is running and sending to this address",
            ],
        }
    }

    /// Helper constructor for out-of-bounds packet reads.
    pub fn out_of_bounds(
        field: impl Into<String>,
        offset: usize,
        length: usize,
        buffer_len: usize,
    ) -> Self {
        TelemetryError::OutOfBounds { field: field.into(), offset, length, buffer_len }
    }

    /// Helper constructor for unsupported descriptors.
    pub fn unsupported_field_spec(
        field: impl Into<String>,
        length: usize,
        target_type: TargetType,
    ) -> Self {
        TelemetryError::UnsupportedFieldSpec { field: field.into(), length, target_type }
    }

    /// Helper constructor for schema validation errors.
    pub fn schema_validation_error(reason: impl Into<String>) -> Self {
        TelemetryError::SchemaValidation { reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }

    /// Helper constructor for transport errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TelemetryError::Parse { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::Connection { reason: err.to_string(), source: Some(Box::new(err)) }
    }
}
