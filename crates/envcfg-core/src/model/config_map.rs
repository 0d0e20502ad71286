use crate::errors::{RecordError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat string-to-string configuration payload
///
/// Keys are unique. Iteration is always key-ascending, which is the order
/// used for display and `.env` export; the stored JSON carries no order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Compact JSON object text, as written to the store
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Indented JSON object text, as shown to an operator
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Parse JSON text that must be a flat object of string values
    ///
    /// # Errors
    /// * `InvalidConfigJson` - text is not JSON
    /// * `ConfigNotObject` - JSON is an array, number, string, bool or null
    /// * `NonStringValue` - an object member is not a string
    pub fn parse_json(text: &str) -> Result<Self> {
        Self::from_json_value(parse_value(text)?)
    }

    /// Like [`ConfigMap::parse_json`], but the JSON literal `null` is "absent"
    ///
    /// # Errors
    /// Same as [`ConfigMap::parse_json`] for anything other than `null`.
    pub fn parse_nullable_json(text: &str) -> Result<Option<Self>> {
        match parse_value(text)? {
            Value::Null => Ok(None),
            value => Self::from_json_value(value).map(Some),
        }
    }

    /// Convert an already-parsed JSON value, enforcing the flat string shape
    ///
    /// # Errors
    /// `ConfigNotObject` or `NonStringValue` when the shape is wrong.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let members = match value {
            Value::Object(members) => members,
            other => {
                return Err(RecordError::ConfigNotObject {
                    found: json_type_name(&other).to_string(),
                })
            }
        };

        let mut map = BTreeMap::new();
        for (key, value) in members {
            match value {
                Value::String(s) => {
                    map.insert(key, s);
                }
                other => {
                    return Err(RecordError::NonStringValue {
                        key,
                        found: json_type_name(&other).to_string(),
                    })
                }
            }
        }
        Ok(Self(map))
    }
}

fn parse_value(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| RecordError::InvalidConfigJson {
        reason: e.to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<BTreeMap<String, String>> for ConfigMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<ConfigMap> for BTreeMap<String, String> {
    fn from(map: ConfigMap) -> Self {
        map.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_key_sorted() {
        let map: ConfigMap = [("B_KEY", "1"), ("A_KEY", "2"), ("C_KEY", "3")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A_KEY", "B_KEY", "C_KEY"]);
    }

    #[test]
    fn test_parse_flat_object() {
        let map = ConfigMap::parse_json(r#"{"HOST": "db", "PORT": "5432"}"#).unwrap();
        assert_eq!(map.get("HOST"), Some("db"));
        assert_eq!(map.get("PORT"), Some("5432"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_empty_object() {
        let map = ConfigMap::parse_json("{}").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = ConfigMap::parse_json("{not json").unwrap_err();
        assert!(matches!(err, RecordError::InvalidConfigJson { .. }));
    }

    #[test]
    fn test_parse_rejects_array() {
        let err = ConfigMap::parse_json(r#"["a", "b"]"#).unwrap_err();
        assert_eq!(
            err,
            RecordError::ConfigNotObject {
                found: "array".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_number_value() {
        let err = ConfigMap::parse_json(r#"{"PORT": 5432}"#).unwrap_err();
        assert_eq!(
            err,
            RecordError::NonStringValue {
                key: "PORT".to_string(),
                found: "number".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_nested_object() {
        let err = ConfigMap::parse_json(r#"{"DB": {"HOST": "x"}}"#).unwrap_err();
        assert!(matches!(err, RecordError::NonStringValue { ref key, .. } if key == "DB"));
    }

    #[test]
    fn test_parse_nullable_null_is_absent() {
        assert_eq!(ConfigMap::parse_nullable_json("null").unwrap(), None);
        assert!(ConfigMap::parse_nullable_json("{}").unwrap().is_some());
    }

    #[test]
    fn test_parse_json_null_is_not_an_object() {
        assert!(matches!(
            ConfigMap::parse_json("null"),
            Err(RecordError::ConfigNotObject { .. })
        ));
    }

    #[test]
    fn test_to_json_is_compact() {
        let map: ConfigMap = [("A", "1")].into_iter().collect();
        assert_eq!(map.to_json().unwrap(), r#"{"A":"1"}"#);
    }

    #[test]
    fn test_serde_is_transparent() {
        let map: ConfigMap = [("K", "v")].into_iter().collect();
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value, serde_json::json!({"K": "v"}));
    }
}
