//! Field target types and decoded values

use serde::{Deserialize, Serialize};

/// Semantic type a field is decoded into.
///
/// The wire width alone does not decide the value: a 4-byte field always
/// carries an IEEE-754 bit pattern, which is then read back as a float,
/// a truncated integer or a flag depending on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Unsigned integer
    #[serde(rename = "uint")]
    UInt,
    /// Signed integer
    #[serde(rename = "int")]
    Int,
    /// 32-bit floating point
    #[serde(rename = "float32")]
    Float32,
    /// Boolean flag
    #[serde(rename = "bool")]
    Bool,
}

impl TargetType {
    /// Returns whether a field of `length` bytes can be decoded into this type.
    ///
    /// 1-byte fields are plain magnitudes, 2-byte fields are unsigned
    /// little-endian integers and 4-byte fields are float bit patterns.
    pub const fn supports_length(&self, length: usize) -> bool {
        matches!(
            (length, self),
            (1, TargetType::UInt | TargetType::Int)
                | (2, TargetType::UInt)
                | (4, TargetType::UInt | TargetType::Int | TargetType::Float32 | TargetType::Bool)
        )
    }

    /// Lowercase name as used in schema files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetType::UInt => "uint",
            TargetType::Int => "int",
            TargetType::Float32 => "float32",
            TargetType::Bool => "bool",
        }
    }
}

/// A single decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    UInt(u64),
    Int(i64),
    Float32(f32),
    Bool(bool),
}

impl Value {
    /// Target type this value belongs to.
    pub const fn target_type(&self) -> TargetType {
        match self {
            Value::UInt(_) => TargetType::UInt,
            Value::Int(_) => TargetType::Int,
            Value::Float32(_) => TargetType::Float32,
            Value::Bool(_) => TargetType::Bool,
        }
    }

    /// Bit-level equality. Unlike `==`, a NaN compares equal to the same NaN
    /// payload and `0.0` differs from `-0.0`.
    pub fn bit_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Numeric view of the value, for display and logging.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::UInt(v) => v as f64,
            Value::Int(v) => v as f64,
            Value::Float32(v) => v as f64,
            Value::Bool(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::UInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}
