//! Identifier coercion for loosely typed snapshot records.
//!
//! The platform export mixes numeric and string ids, sometimes within the same
//! field across records. Everything here normalizes explicitly so cross
//! references are compared on one canonical form.

use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Identifier of an entity as it appears in the source snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NaturalId {
    Number(i64),
    Text(String),
}

impl NaturalId {
    /// Canonical string form used for cross-reference matching.
    ///
    /// Numbers render in plain decimal, so schedule `7` and label value `"7"`
    /// share the key `"7"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NaturalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalId::Number(n) => write!(f, "{}", n),
            NaturalId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NaturalId {
    fn from(id: i64) -> Self {
        NaturalId::Number(id)
    }
}

impl From<String> for NaturalId {
    fn from(id: String) -> Self {
        NaturalId::Text(id)
    }
}

impl From<&str> for NaturalId {
    fn from(id: &str) -> Self {
        NaturalId::Text(id.to_string())
    }
}

/// Coerce a JSON value into an integer id. Accepts numbers and numeric strings.
pub fn value_as_id(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn ids_from_value(value: &JsonValue) -> Vec<i64> {
    match value {
        JsonValue::Array(items) => items.iter().filter_map(value_as_id).collect(),
        JsonValue::Null => Vec::new(),
        other => value_as_id(other).into_iter().collect(),
    }
}

pub(crate) fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    value_as_id(&value)
        .ok_or_else(|| D::Error::custom(format!("expected numeric id, found {}", value)))
}

pub(crate) fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_id))
}

pub(crate) fn integer_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().map(ids_from_value).unwrap_or_default())
}

/// Like [`integer_list`] but keeps `null` distinct from an empty list.
pub(crate) fn nullable_integer_list<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(ids_from_value(&v)),
    })
}

/// Membership sets arrive as `{"3": true, "12": true}`; plain arrays are
/// accepted too. Output is sorted ascending.
pub(crate) fn membership_set<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    let mut ids: Vec<i64> = match value {
        Some(JsonValue::Object(map)) => map
            .iter()
            .filter(|(_, member)| !matches!(member, JsonValue::Bool(false) | JsonValue::Null))
            .filter_map(|(key, _)| key.trim().parse().ok())
            .collect(),
        Some(other) => ids_from_value(&other),
        None => Vec::new(),
    };
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    value_as_text(&value)
        .ok_or_else(|| D::Error::custom(format!("expected string id, found {}", value)))
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_text))
}

/// Textual form of a scalar value; labels and names are always compared as text.
pub fn value_as_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "integer_list")]
        list: Vec<i64>,
        #[serde(default, deserialize_with = "nullable_integer_list")]
        nullable: Option<Vec<i64>>,
        #[serde(default, deserialize_with = "membership_set")]
        members: Vec<i64>,
    }

    #[test]
    fn test_value_as_id_accepts_numeric_strings() {
        assert_eq!(value_as_id(&json!(7)), Some(7));
        assert_eq!(value_as_id(&json!("7")), Some(7));
        assert_eq!(value_as_id(&json!(" 12 ")), Some(12));
        assert_eq!(value_as_id(&json!(3.0)), Some(3));
        assert_eq!(value_as_id(&json!("abc")), None);
        assert_eq!(value_as_id(&json!(null)), None);
        assert_eq!(value_as_id(&json!(1.5)), None);
    }

    #[test]
    fn test_natural_id_key_is_decimal() {
        assert_eq!(NaturalId::from(7).key(), "7");
        assert_eq!(NaturalId::from("abc123").key(), "abc123");
    }

    #[test]
    fn test_integer_list_drops_non_ids() {
        let probe: Probe = serde_json::from_value(json!({ "list": [1, "2", "x", null] })).unwrap();
        assert_eq!(probe.list, vec![1, 2]);
    }

    #[test]
    fn test_nullable_list_keeps_null() {
        let probe: Probe = serde_json::from_value(json!({ "nullable": null })).unwrap();
        assert_eq!(probe.nullable, None);

        let probe: Probe = serde_json::from_value(json!({ "nullable": [4] })).unwrap();
        assert_eq!(probe.nullable, Some(vec![4]));

        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.nullable, None);
    }

    #[test]
    fn test_membership_set_from_object_keys() {
        let probe: Probe =
            serde_json::from_value(json!({ "members": { "10": true, "2": true, "3": false } }))
                .unwrap();
        assert_eq!(probe.members, vec![2, 10]);
    }

    #[test]
    fn test_membership_set_from_array() {
        let probe: Probe = serde_json::from_value(json!({ "members": [5, 1, 5] })).unwrap();
        assert_eq!(probe.members, vec![1, 5]);
    }
}
