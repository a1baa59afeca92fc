//! Edge (containment link) in the collection graph.

use serde::{Deserialize, Serialize};

/// A directed edge: `from` structurally contains or points to `to`.
///
/// Edges carry no identity beyond their endpoint pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}
