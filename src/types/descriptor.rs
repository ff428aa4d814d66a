//! Field descriptor type

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::TargetType;

/// Width assumed for descriptors that omit `length` in a schema file.
pub const DEFAULT_FIELD_LENGTH: usize = 4;

fn default_length() -> usize {
    DEFAULT_FIELD_LENGTH
}

/// Where and how to extract one field from a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within a schema
    pub name: Cow<'static, str>,
    /// Byte offset from the start of the packet
    pub offset: usize,
    /// Byte length on the wire (1, 2 or 4)
    #[serde(default = "default_length")]
    pub length: usize,
    /// Type the bytes are decoded into
    #[serde(rename = "type")]
    pub target_type: TargetType,
}

impl FieldDescriptor {
    /// Descriptor over a static name, usable in `const` tables.
    pub const fn new(
        name: &'static str,
        offset: usize,
        length: usize,
        target_type: TargetType,
    ) -> Self {
        Self { name: Cow::Borrowed(name), offset, length, target_type }
    }

    /// Descriptor with an owned name, for schemas built at runtime.
    pub fn owned(name: impl Into<String>, offset: usize, length: usize, target_type: TargetType) -> Self {
        Self { name: Cow::Owned(name.into()), offset, length, target_type }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One past the last byte this field reads.
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether `(length, target_type)` is a combination the decoder handles.
    pub const fn is_supported(&self) -> bool {
        self.target_type.supports_length(self.length)
    }
}
