//! AttributeSet — the key-to-attribute mapping on collection nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Attribute, AttributeValue, Kind, merge::merge_documents};
use crate::{Error, Result};

/// An unordered mapping from key to [`Attribute`], keys unique.
///
/// Internally ordered by key so that `as_json()` is deterministic for a
/// given logical content — two sets with equal contents serialize to the
/// same JSON string regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: BTreeMap<String, AttributeValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any previous value under the same key.
    pub fn insert(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute.key, attribute.value);
    }

    /// Builder-style insert.
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.insert(attribute);
        self
    }

    /// True only if `key` exists, its kind matches, and its value compares
    /// equal. A kind mismatch is "not found", never an error.
    pub fn exists(&self, key: &str, kind: Kind, value: &AttributeValue) -> bool {
        match self.attributes.get(key) {
            Some(v) => v.kind() == kind && v == value,
            None => false,
        }
    }

    pub fn find(&self, key: &str) -> Option<Attribute> {
        self.attributes.get(key).map(|value| Attribute {
            key: key.to_owned(),
            value: value.clone(),
        })
    }

    /// All attributes, in canonical key order.
    pub fn list(&self) -> Vec<Attribute> {
        self.attributes
            .iter()
            .map(|(key, value)| Attribute { key: key.clone(), value: value.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The canonical wire format: a flat JSON object mapping key to the
    /// native JSON value (`null`, boolean, number, or string).
    pub fn as_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.as_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Parse the wire format back into a set.
    ///
    /// Non-object documents and non-scalar values are rejected. All per-key
    /// failures are aggregated into a single [`Error::InvalidAttributes`]
    /// rather than failing fast on the first.
    pub fn from_json(document: &serde_json::Value) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| Error::InvalidAttributes("document is not a JSON object".into()))?;

        let mut set = AttributeSet::new();
        let mut failures = Vec::new();
        for (key, value) in object {
            match AttributeValue::from_json(value) {
                Some(v) => {
                    set.attributes.insert(key.clone(), v);
                }
                None => failures.push(format!(
                    "value for key \"{key}\" is not a scalar attribute"
                )),
            }
        }

        if failures.is_empty() {
            Ok(set)
        } else {
            Err(Error::InvalidAttributes(failures.join("; ")))
        }
    }

    /// Deep-merge the wire documents of `sets` left-to-right and re-parse
    /// the result. See [`merge_documents`] for the patch-merge rules; since
    /// attribute documents are flat, the result is always flat as well.
    ///
    /// Merge of zero sets yields an empty set. Merge is **not** guaranteed
    /// to be associative across differing document shapes.
    pub fn merge(sets: &[AttributeSet]) -> Result<AttributeSet> {
        let merged = merge_documents(sets.iter().map(|s| s.as_json()))?;
        Self::from_json(&merged)
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample() -> AttributeSet {
        AttributeSet::new()
            .with(Attribute::new_string("title", "node1"))
            .with(Attribute::new_number("size", 29.0))
            .with(Attribute::new_bool("published", true))
            .with(Attribute::new_null("deprecated"))
    }

    #[test]
    fn test_exists_requires_kind_and_value() {
        let set = sample();
        assert!(set.exists("title", Kind::String, &"node1".into()));
        // kind mismatch is "not found", not an error
        assert!(!set.exists("title", Kind::Number, &29.0.into()));
        assert!(!set.exists("title", Kind::String, &"other".into()));
        assert!(!set.exists("missing", Kind::String, &"node1".into()));
    }

    #[test]
    fn test_as_json_is_canonical() {
        let forward = sample();
        let mut reversed = AttributeSet::new();
        for attribute in forward.list().into_iter().rev() {
            reversed.insert(attribute);
        }
        assert_eq!(
            serde_json::to_string(&forward.as_json()).unwrap(),
            serde_json::to_string(&reversed.as_json()).unwrap(),
        );
    }

    #[test]
    fn test_as_json_wire_shape() {
        assert_eq!(
            sample().as_json(),
            json!({
                "deprecated": null,
                "published": true,
                "size": 29.0,
                "title": "node1",
            })
        );
    }

    #[test]
    fn test_from_json_round_trip() {
        let set = sample();
        let parsed = AttributeSet::from_json(&set.as_json()).unwrap();
        assert_eq!(parsed, set);
        for attribute in set.list() {
            assert!(parsed.exists(&attribute.key, attribute.kind(), &attribute.value));
        }
    }

    #[test]
    fn test_from_json_aggregates_failures() {
        let document = json!({
            "ok": "fine",
            "bad1": [1, 2],
            "bad2": {"nested": true},
        });
        let err = AttributeSet::from_json(&document).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad1"), "{message}");
        assert!(message.contains("bad2"), "{message}");
    }

    #[test]
    fn test_merge_flat_sets() {
        let a = AttributeSet::new().with(Attribute::new_string("title", "old"));
        let b = AttributeSet::new()
            .with(Attribute::new_string("title", "new"))
            .with(Attribute::new_number("size", 2.0));

        let merged = AttributeSet::merge(&[a, b]).unwrap();
        assert!(merged.exists("title", Kind::String, &"new".into()));
        assert!(merged.exists("size", Kind::Number, &2.0.into()));
    }

    #[test]
    fn test_merge_zero_sets_is_empty() {
        assert!(AttributeSet::merge(&[]).unwrap().is_empty());
    }
}
