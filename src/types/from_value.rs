//! Typed extraction from decoded values

use super::{TargetType, Value};

/// Trait for Rust types that can be read out of a decoded [`Value`].
pub trait FromValue: Sized {
    /// Whether a `length`-byte field of `target` can be read as this type
    /// for every value it can decode to.
    fn accepts(target: TargetType, length: usize) -> bool;

    /// Convert a decoded value.
    fn from_value(value: &Value) -> crate::Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> crate::TelemetryError {
    crate::TelemetryError::TypeConversion {
        details: format!("Expected {}, got {:?}", expected, value.target_type()),
    }
}

impl FromValue for f32 {
    fn accepts(target: TargetType, _length: usize) -> bool {
        target == TargetType::Float32
    }

    fn from_value(value: &Value) -> crate::Result<Self> {
        match *value {
            Value::Float32(v) => Ok(v),
            _ => Err(mismatch("Float32", value)),
        }
    }
}

impl FromValue for u64 {
    fn accepts(target: TargetType, _length: usize) -> bool {
        target == TargetType::UInt
    }

    fn from_value(value: &Value) -> crate::Result<Self> {
        match *value {
            Value::UInt(v) => Ok(v),
            _ => Err(mismatch("UInt", value)),
        }
    }
}

impl FromValue for i64 {
    fn accepts(target: TargetType, _length: usize) -> bool {
        target == TargetType::Int
    }

    fn from_value(value: &Value) -> crate::Result<Self> {
        match *value {
            Value::Int(v) => Ok(v),
            _ => Err(mismatch("Int", value)),
        }
    }
}

impl FromValue for bool {
    fn accepts(target: TargetType, _length: usize) -> bool {
        target == TargetType::Bool
    }

    fn from_value(value: &Value) -> crate::Result<Self> {
        match *value {
            Value::Bool(v) => Ok(v),
            _ => Err(mismatch("Bool", value)),
        }
    }
}

// Narrow unsigned integers for 1- and 2-byte fields. A 4-byte field can decode
// to any float magnitude, so it never narrows.
macro_rules! narrow_uint {
    ($($ty:ty => $max_len:literal),*) => {
        $(
            impl FromValue for $ty {
                fn accepts(target: TargetType, length: usize) -> bool {
                    target == TargetType::UInt && length <= $max_len
                }

                fn from_value(value: &Value) -> crate::Result<Self> {
                    let wide = u64::from_value(value)?;
                    <$ty>::try_from(wide).map_err(|_| crate::TelemetryError::TypeConversion {
                        details: format!("{} does not fit in {}", wide, stringify!($ty)),
                    })
                }
            }
        )*
    };
}

narrow_uint!(u8 => 1, u16 => 2, u32 => 2);

impl FromValue for i32 {
    fn accepts(target: TargetType, length: usize) -> bool {
        target == TargetType::Int && length == 1
    }

    fn from_value(value: &Value) -> crate::Result<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| crate::TelemetryError::TypeConversion {
            details: format!("{} does not fit in i32", wide),
        })
    }
}
