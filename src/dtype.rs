use serde::Serialize;

use crate::errors::ConvertError;

/// Smallest finite `float16` value, used as the missing-data sentinel.
const FLOAT16_MIN: f64 = -65504.0;
/// Smallest finite `bfloat16` value, used as the missing-data sentinel.
const BFLOAT16_MIN: f64 = -3.3895313892515355e38;

/// Internal numeric/byte-string element type for scalar leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// IEEE half-precision float.
    Float16,
    /// Brain floating point (8-bit exponent, 7-bit mantissa).
    BFloat16,
    /// IEEE single-precision float.
    Float32,
    /// IEEE double-precision float.
    Float64,
    /// Single-precision complex pair.
    Complex64,
    /// Double-precision complex pair.
    Complex128,
    /// Variable-length byte string.
    Bytes,
}

impl Dtype {
    /// Canonical lowercase name of this dtype.
    pub fn name(self) -> &'static str {
        match self {
            Dtype::Bool => "bool",
            Dtype::Int8 => "int8",
            Dtype::Int16 => "int16",
            Dtype::Int32 => "int32",
            Dtype::Int64 => "int64",
            Dtype::UInt8 => "uint8",
            Dtype::UInt16 => "uint16",
            Dtype::UInt32 => "uint32",
            Dtype::UInt64 => "uint64",
            Dtype::Float16 => "float16",
            Dtype::BFloat16 => "bfloat16",
            Dtype::Float32 => "float32",
            Dtype::Float64 => "float64",
            Dtype::Complex64 => "complex64",
            Dtype::Complex128 => "complex128",
            Dtype::Bytes => "bytes",
        }
    }

    /// True for signed and unsigned integer dtypes.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Dtype::Int8
                | Dtype::Int16
                | Dtype::Int32
                | Dtype::Int64
                | Dtype::UInt8
                | Dtype::UInt16
                | Dtype::UInt32
                | Dtype::UInt64
        )
    }

    /// True for real floating-point dtypes (complex pairs excluded).
    pub fn is_floating(self) -> bool {
        matches!(
            self,
            Dtype::Float16 | Dtype::BFloat16 | Dtype::Float32 | Dtype::Float64
        )
    }

    /// True for the byte-string dtype.
    pub fn is_string(self) -> bool {
        matches!(self, Dtype::Bytes)
    }

    /// True for the boolean dtype.
    pub fn is_bool(self) -> bool {
        matches!(self, Dtype::Bool)
    }

    /// Minimal representable value of an integer dtype.
    ///
    /// This is the missing-data sentinel for integer leaves. Note that the
    /// minimum of every unsigned width is `0`, which can collide with real
    /// data; consumers must treat the sentinel as "missing marker", not
    /// "guaranteed absent".
    pub fn integer_min(self) -> Option<i64> {
        match self {
            Dtype::Int8 => Some(i8::MIN as i64),
            Dtype::Int16 => Some(i16::MIN as i64),
            Dtype::Int32 => Some(i32::MIN as i64),
            Dtype::Int64 => Some(i64::MIN),
            Dtype::UInt8 | Dtype::UInt16 | Dtype::UInt32 | Dtype::UInt64 => Some(0),
            _ => None,
        }
    }

    /// Minimal representable finite value of a floating dtype.
    ///
    /// The missing-data sentinel for floating leaves; same collision caveat
    /// as [`Dtype::integer_min`].
    pub fn float_min(self) -> Option<f64> {
        match self {
            Dtype::Float16 => Some(FLOAT16_MIN),
            Dtype::BFloat16 => Some(BFLOAT16_MIN),
            Dtype::Float32 => Some(f32::MIN as f64),
            Dtype::Float64 => Some(f64::MIN),
            _ => None,
        }
    }

    /// Look up a dtype by its numeric-namespace name (`int32`, `float64`, ...).
    fn from_numeric_name(name: &str) -> Option<Dtype> {
        match name {
            "bool" => Some(Dtype::Bool),
            "int8" => Some(Dtype::Int8),
            "int16" => Some(Dtype::Int16),
            "int32" => Some(Dtype::Int32),
            "int64" => Some(Dtype::Int64),
            "uint8" => Some(Dtype::UInt8),
            "uint16" => Some(Dtype::UInt16),
            "uint32" => Some(Dtype::UInt32),
            "uint64" => Some(Dtype::UInt64),
            "float16" => Some(Dtype::Float16),
            "float32" => Some(Dtype::Float32),
            "float64" => Some(Dtype::Float64),
            _ => None,
        }
    }

    /// Look up a dtype by its tensor-dtype-namespace name.
    ///
    /// Covers names that only exist in the tensor namespace; plain numeric
    /// names are resolved earlier by [`Dtype::from_numeric_name`].
    fn from_tensor_name(name: &str) -> Option<Dtype> {
        match name {
            "bfloat16" => Some(Dtype::BFloat16),
            "half" => Some(Dtype::Float16),
            "complex64" => Some(Dtype::Complex64),
            "complex128" => Some(Dtype::Complex128),
            _ => None,
        }
    }
}

/// Marker prefix identifying timestamp dtypes, e.g. `timestamp[s]`.
const TIMESTAMP_PREFIX: &str = "timestamp";

/// Resolve a foreign primitive type name to an internal [`Dtype`].
///
/// Resolution order is fixed:
/// 1. alias table for known foreign names (`bool`, `float`, `double`, and
///    the string family),
/// 2. numeric-namespace names (`int32`, `uint8`, ...),
/// 3. timestamp-prefixed names, represented as `int64` seconds since the
///    UNIX epoch,
/// 4. tensor-dtype-namespace names (`bfloat16`, `half`, complex pairs).
///
/// Anything else fails with [`ConvertError::UnrecognizedDtype`].
pub fn resolve_dtype(foreign_dtype: &str) -> Result<Dtype, ConvertError> {
    let aliased = match foreign_dtype {
        "bool" => Some(Dtype::Bool),
        "float" => Some(Dtype::Float32),
        "double" => Some(Dtype::Float64),
        "large_string" | "utf8" | "string" => Some(Dtype::Bytes),
        _ => None,
    };
    if let Some(dtype) = aliased {
        return Ok(dtype);
    }
    if let Some(dtype) = Dtype::from_numeric_name(foreign_dtype) {
        return Ok(dtype);
    }
    if foreign_dtype.starts_with(TIMESTAMP_PREFIX) {
        // Timestamps are converted to seconds since the UNIX epoch.
        return Ok(Dtype::Int64);
    }
    if let Some(dtype) = Dtype::from_tensor_name(foreign_dtype) {
        return Ok(dtype);
    }
    Err(ConvertError::UnrecognizedDtype {
        dtype: foreign_dtype.to_string(),
    })
}
