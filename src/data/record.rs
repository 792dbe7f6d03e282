use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::data::datavalue::{DataValue, NULL_VALUE};

/// One row of tabular data: an ordered field-name to value mapping.
///
/// Field order is insertion order, which for JSON input is the order the
/// keys appear in the object. Column inference relies on that order.
/// No schema is enforced; two records may carry different fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, DataValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field, replacing an existing value in place.
    /// Returns the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Option<DataValue> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Field value, with absent fields reading as `Null`
    pub fn value(&self, key: &str) -> &DataValue {
        self.get(key).unwrap_or(&NULL_VALUE)
    }

    /// Field value unless it is absent or `Null`
    pub fn present(&self, key: &str) -> Option<&DataValue> {
        self.get(key).filter(|v| !v.is_null())
    }

    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, DataValue::from(v)))
                .collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<DataValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(map) => Ok(Record::from(map)),
            other => Err(de::Error::custom(format!(
                "expected a JSON object for a record, found {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_replaces_in_place() {
        let mut record = Record::new().with("name", "Alice").with("role", "Auditor");
        let old = record.set("name", "Alicia");

        assert_eq!(old, Some(DataValue::from("Alice")));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["name", "role"]);
        assert_eq!(record.value("name"), &DataValue::from("Alicia"));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let record = Record::new().with("lastLogin", DataValue::Null);

        assert!(record.contains_key("lastLogin"));
        assert!(record.present("lastLogin").is_none());
        assert!(record.get("department").is_none());
        assert!(record.value("department").is_null());
    }

    #[test]
    fn test_json_object_order_is_kept() {
        let record: Record =
            serde_json::from_value(json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result: Result<Record, _> = serde_json::from_value(json!([1, 2]));
        assert!(result.is_err());
    }

    #[test]
    fn test_remove() {
        let mut record: Record = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(record.remove("a"), Some(DataValue::Integer(1)));
        assert_eq!(record.remove("a"), None);
        assert_eq!(record.len(), 1);
    }
}
