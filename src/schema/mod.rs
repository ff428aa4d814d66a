//! Packet schemas
//!
//! The canonical dash layout is compiled in as a static descriptor table
//! ([`DASH_FIELDS`]) and validated once on first use. Alternative layouts can
//! be described in YAML and loaded with [`load_schema_file`]:
//!
//! ```yaml
//! packet_size: 324
//! fields:
//!   - { name: IsRaceOn, offset: 0, type: bool }   # length defaults to 4
//!   - { name: Lap, offset: 312, length: 2, type: uint }
//! ```

mod dash;

pub use dash::{DASH_FIELDS, DASH_PACKET_SIZE, MAX_DATAGRAM_SIZE};

use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::types::{FieldDescriptor, PacketSchema};
use crate::{Result, TelemetryError};

static DASH_SCHEMA: LazyLock<Arc<PacketSchema>> = LazyLock::new(|| {
    Arc::new(
        PacketSchema::new(DASH_FIELDS.to_vec(), DASH_PACKET_SIZE)
            .expect("built-in dash table must validate"),
    )
});

/// The canonical dash schema, shared by every caller.
pub fn dash_schema() -> Arc<PacketSchema> {
    Arc::clone(&DASH_SCHEMA)
}

/// On-disk schema description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    packet_size: usize,
    fields: Vec<FieldDescriptor>,
}

/// Parse and validate a YAML schema description.
pub fn parse_schema(yaml: &str) -> Result<PacketSchema> {
    let file: SchemaFile = serde_yaml_ng::from_str(yaml)
        .map_err(|e| TelemetryError::parse_error("schema YAML", e.to_string()))?;

    debug!(field_count = file.fields.len(), packet_size = file.packet_size, "Parsed schema file");

    PacketSchema::new(file.fields, file.packet_size)
}

/// Load and validate a YAML schema from disk.
pub fn load_schema_file<P: AsRef<Path>>(path: P) -> Result<PacketSchema> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path)
        .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;
    parse_schema(&yaml)
}
