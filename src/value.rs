use std::path::PathBuf;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use indexmap::IndexMap;

use crate::types::FieldName;

/// Cap applied when embedding a value into an error message.
const SUMMARY_LIMIT: usize = 200;

/// Dynamic value shared by foreign records and converted internal examples.
///
/// Foreign records arrive in this shape (usually via
/// `From<serde_json::Value>`, with media and timestamp variants attached by
/// the materializer) and are accepted loosely; conversion rewrites them into
/// values that conform exactly to the internal schema.
#[derive(Clone, Debug)]
pub enum Value {
    /// Absent value; always converts to the schema node's default.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Text string.
    Str(String),
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Date/time; always converts to epoch seconds.
    DateTime(DateTime<Utc>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Named map with stable field order.
    Map(IndexMap<FieldName, Value>),
    /// Reference to a file on the local filesystem.
    Path(PathBuf),
    /// Decoded in-memory image.
    Image(DynamicImage),
}

impl Value {
    /// Short variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Path(_) => "path",
            Value::Image(_) => "image",
        }
    }

    /// Numeric view of integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Truncated debug rendering for error messages.
    ///
    /// Media payloads and long sequences would otherwise flood the message.
    pub fn summary(&self) -> String {
        let mut rendered = match self {
            Value::Image(image) => {
                format!("image({}x{})", image.width(), image.height())
            }
            other => format!("{other:?}"),
        };
        if rendered.len() > SUMMARY_LIMIT {
            let mut cut = SUMMARY_LIMIT;
            while !rendered.is_char_boundary(cut) {
                cut -= 1;
            }
            rendered.truncate(cut);
            rendered.push('…');
        }
        rendered
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Image(a), Value::Image(b)) => {
                a.width() == b.width()
                    && a.height() == b.height()
                    && a.color() == b.color()
                    && a.as_bytes() == b.as_bytes()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Bool(flag),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Value::Int(int)
                } else {
                    Value::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(text) => Value::Str(text),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(name, field)| (name, Value::from(field)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
