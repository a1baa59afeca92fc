//! Node in the collection graph.

use serde::{Deserialize, Serialize};

use super::{AttributeSet, Descriptor};

/// A vertex in a collection.
///
/// `id` is globally unique within its collection (the loader uses the
/// content digest). `address` is the human-meaningful location, used in
/// diagnostics such as the multiple-roots error. Nodes are immutable once
/// inserted into a [`Collection`](crate::Collection); an update means
/// building a replacement node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub address: String,
    pub attributes: AttributeSet,
    /// Backing reference to the external blob this node was built from,
    /// present only on loader-materialized nodes.
    pub descriptor: Option<Descriptor>,
}

impl Node {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            attributes: AttributeSet::new(),
            descriptor: None,
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
}
