//! # Matcher — attribute predicates over collection nodes
//!
//! A matcher is a fixed mapping from attribute key to expected value,
//! compiled from a query configuration file. Two comparison semantics:
//!
//! | Matcher | Semantics |
//! |---------|-----------|
//! | `PartialAttributeMatcher` | every matcher key present and equal; extra node attributes ignored |
//! | `ExactAttributeMatcher` | node carries exactly the matcher's keys, each equal |

use std::collections::BTreeMap;

use crate::model::{AttributeValue, Node};

/// A predicate over a node's attribute set.
pub trait Matcher {
    fn matches(&self, node: &Node) -> bool;
}

// ============================================================================
// Partial match
// ============================================================================

/// Subset semantics: true iff every key in the matcher exists on the node
/// with an equal value. Attributes on the node beyond the matcher's keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialAttributeMatcher {
    expected: BTreeMap<String, AttributeValue>,
}

impl Matcher for PartialAttributeMatcher {
    fn matches(&self, node: &Node) -> bool {
        self.expected
            .iter()
            .all(|(key, value)| node.attributes.exists(key, value.kind(), value))
    }
}

// ============================================================================
// Exact match
// ============================================================================

/// Full-set equality: true iff the node's attribute set contains exactly
/// the matcher's keys (same cardinality), each with an equal value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactAttributeMatcher {
    expected: BTreeMap<String, AttributeValue>,
}

impl Matcher for ExactAttributeMatcher {
    fn matches(&self, node: &Node) -> bool {
        node.attributes.len() == self.expected.len()
            && self
                .expected
                .iter()
                .all(|(key, value)| node.attributes.exists(key, value.kind(), value))
    }
}

// ============================================================================
// Construction from flat key → value pairs
// ============================================================================

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for PartialAttributeMatcher {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            expected: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for ExactAttributeMatcher {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            expected: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeSet};

    fn node_with(attributes: AttributeSet) -> Node {
        Node::new("sha256:test", "test").with_attributes(attributes)
    }

    #[test]
    fn test_partial_ignores_extra_attributes() {
        let matcher: PartialAttributeMatcher =
            [("title", "node1")].into_iter().collect();
        let node = node_with(
            AttributeSet::new()
                .with(Attribute::new_string("title", "node1"))
                .with(Attribute::new_string("another", "attribute")),
        );
        assert!(matcher.matches(&node));
    }

    #[test]
    fn test_partial_missing_key_fails() {
        let matcher: PartialAttributeMatcher =
            [("title", "node1")].into_iter().collect();
        let node = node_with(
            AttributeSet::new().with(Attribute::new_string("other", "node1")),
        );
        assert!(!matcher.matches(&node));
    }

    #[test]
    fn test_partial_kind_mismatch_fails() {
        let matcher: PartialAttributeMatcher =
            [("size", AttributeValue::Number(5.0))].into_iter().collect();
        let node = node_with(
            AttributeSet::new().with(Attribute::new_string("size", "5")),
        );
        assert!(!matcher.matches(&node));
    }

    #[test]
    fn test_exact_rejects_extra_attributes() {
        let matcher: ExactAttributeMatcher = [("kind", "txt")].into_iter().collect();
        let exact = node_with(AttributeSet::new().with(Attribute::new_string("kind", "txt")));
        assert!(matcher.matches(&exact));

        let extra = node_with(
            AttributeSet::new()
                .with(Attribute::new_string("kind", "txt"))
                .with(Attribute::new_string("another", "attribute")),
        );
        assert!(!matcher.matches(&extra));
    }

    #[test]
    fn test_empty_partial_matches_everything() {
        let matcher = PartialAttributeMatcher::default();
        assert!(matcher.matches(&node_with(AttributeSet::new())));
        assert!(matcher.matches(&node_with(
            AttributeSet::new().with(Attribute::new_bool("any", true))
        )));
    }
}
