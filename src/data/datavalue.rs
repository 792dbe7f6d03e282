use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::data::record::Record;

/// Shared `Null` used when a field lookup misses
pub(crate) static NULL_VALUE: DataValue = DataValue::Null;

/// Represents the data type of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

/// A single field value in a record.
///
/// Records coming from JSON are untyped, so every value carries its own tag.
/// `Integer` and `Float` are both treated as numbers when comparing.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<DataValue>),
    Object(Record),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, DataValue::Integer(_) | DataValue::Float(_))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Null => DataType::Null,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Float(_) => DataType::Float,
            DataValue::String(_) => DataType::String,
            DataValue::Array(_) => DataType::Array,
            DataValue::Object(_) => DataType::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, widening integers to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Lower-cased text used for substring search
    pub fn search_text(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            DataValue::Null => JsonValue::Null,
            DataValue::Boolean(b) => JsonValue::Bool(*b),
            DataValue::Integer(i) => JsonValue::from(*i),
            // Non-finite floats have no JSON form
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DataValue::String(s) => JsonValue::String(s.clone()),
            DataValue::Array(items) => JsonValue::Array(items.iter().map(|v| v.to_json()).collect()),
            DataValue::Object(record) => record.to_json(),
        }
    }
}

/// Text form of a value, as used for search and mixed-type comparison.
///
/// Arrays join their elements with `,` and objects print as compact JSON.
/// `Null` prints as the empty string.
impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => Ok(()),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            DataValue::Object(record) => write!(f, "{}", record.to_json()),
        }
    }
}

impl From<JsonValue> for DataValue {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    DataValue::Float(f)
                } else {
                    DataValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => DataValue::String(s),
            JsonValue::Array(items) => {
                DataValue::Array(items.into_iter().map(DataValue::from).collect())
            }
            JsonValue::Object(map) => DataValue::Object(Record::from(map)),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Boolean(b)
    }
}

impl From<i32> for DataValue {
    fn from(i: i32) -> Self {
        DataValue::Integer(i64::from(i))
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Integer(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<Record> for DataValue {
    fn from(record: Record) -> Self {
        DataValue::Object(record)
    }
}

impl<T: Into<DataValue>> From<Vec<T>> for DataValue {
    fn from(items: Vec<T>) -> Self {
        DataValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::Null => serializer.serialize_unit(),
            DataValue::Boolean(b) => serializer.serialize_bool(*b),
            DataValue::Integer(i) => serializer.serialize_i64(*i),
            DataValue::Float(f) => serializer.serialize_f64(*f),
            DataValue::String(s) => serializer.serialize_str(s),
            DataValue::Array(items) => serializer.collect_seq(items),
            DataValue::Object(record) => record.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(DataValue::from)
    }
}
