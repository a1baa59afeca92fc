//! # Collection — the artifact DAG
//!
//! A `Collection` is a named graph: a node-by-ID index plus two adjacency
//! indices (`from` and `to`), maintained consistently on every edge insert.
//!
//! Lifecycle: created empty, populated monotonically during a single build
//! pass (no deletion), then queried read-only. Derived graphs (`subset`,
//! `sub_collection`) copy surviving nodes and never mutate the parent.

use hashbrown::{HashMap, HashSet};

use crate::matcher::Matcher;
use crate::model::{Edge, Node, merge_documents};
use crate::traversal::GraphView;
use crate::{Error, Result};

/// The graph aggregating nodes and edges for one logical artifact tree.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// The registry reference this collection was materialized from.
    pub reference: String,
    nodes: HashMap<String, Node>,
    /// id → edges originating at id.
    from: HashMap<String, HashSet<Edge>>,
    /// id → edges terminating at id.
    to: HashMap<String, HashSet<Edge>>,
}

impl Collection {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            nodes: HashMap::new(),
            from: HashMap::new(),
            to: HashMap::new(),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Insert a node. Fails if a node with the same ID already exists.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert an edge. Both endpoints must already exist as nodes.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if !self.nodes.contains_key(&edge.from) {
            return Err(Error::MissingNode(edge.from));
        }
        if !self.nodes.contains_key(&edge.to) {
            return Err(Error::MissingNode(edge.to));
        }
        self.from.entry(edge.from.clone()).or_default().insert(edge.clone());
        self.to.entry(edge.to.clone()).or_default().insert(edge);
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.from.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes one hop away via outgoing edges. Unknown id yields empty.
    pub fn from(&self, id: &str) -> Vec<&Node> {
        self.from
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|edge| self.nodes.get(&edge.to))
            .collect()
    }

    /// Nodes one hop away via incoming edges. Unknown id yields empty.
    pub fn to(&self, id: &str) -> Vec<&Node> {
        self.to
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|edge| self.nodes.get(&edge.from))
            .collect()
    }

    // ========================================================================
    // Root inference
    // ========================================================================

    /// The unique node that never appears as an edge destination.
    ///
    /// Computed with an explicit reverse reference-count pass over every
    /// node's forward adjacency. Zero candidates (e.g. a cycle touching all
    /// nodes) and multiple candidates are both errors; the latter lists the
    /// candidate addresses sorted lexicographically for reproducible
    /// messages.
    pub fn root(&self) -> Result<&Node> {
        let mut has_parent: HashSet<&str> = HashSet::new();
        for edges in self.from.values() {
            for edge in edges {
                has_parent.insert(edge.to.as_str());
            }
        }

        let candidates: Vec<&Node> = self
            .nodes
            .values()
            .filter(|node| !has_parent.contains(node.id.as_str()))
            .collect();

        match candidates.as_slice() {
            [] => Err(Error::NoRoot),
            [root] => Ok(root),
            many => {
                let mut addresses: Vec<&str> =
                    many.iter().map(|node| node.address.as_str()).collect();
                addresses.sort_unstable();
                Err(Error::MultipleRoots(addresses.join(", ")))
            }
        }
    }

    // ========================================================================
    // Induced subgraphs
    // ========================================================================

    /// The subgraph reachable from `id`, keeping nodes accepted by
    /// `node_fn` and edges accepted by `edge_fn`. Traversal only follows
    /// accepted edges; an edge survives when it is accepted and both of its
    /// endpoints survived.
    pub fn subset(
        &self,
        id: &str,
        node_fn: impl Fn(&Node) -> bool,
        edge_fn: impl Fn(&Edge) -> bool,
    ) -> Result<Collection> {
        self.subset_impl(id, &node_fn, &edge_fn)
    }

    /// [`subset`](Self::subset) filtering edges only.
    pub fn edge_subgraph(&self, id: &str, edge_fn: impl Fn(&Edge) -> bool) -> Result<Collection> {
        self.subset_impl(id, &|_| true, &edge_fn)
    }

    /// [`subset`](Self::subset) with an explicit membership list instead of
    /// a node predicate.
    pub fn subset_with_nodes(
        &self,
        id: &str,
        nodes: &[&str],
        edge_fn: impl Fn(&Edge) -> bool,
    ) -> Result<Collection> {
        let members: HashSet<&str> = nodes.iter().copied().collect();
        self.subset_impl(id, &|node| members.contains(node.id.as_str()), &edge_fn)
    }

    fn subset_impl(
        &self,
        id: &str,
        node_fn: &dyn Fn(&Node) -> bool,
        edge_fn: &dyn Fn(&Edge) -> bool,
    ) -> Result<Collection> {
        let mut subgraph = Collection::new(self.reference.clone());
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![id];
        let mut kept_edges: Vec<&Edge> = Vec::new();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node_fn(node) {
                subgraph.add_node(node.clone())?;
            }
            for edge in self.from.get(current).into_iter().flatten() {
                if edge_fn(edge) {
                    kept_edges.push(edge);
                    stack.push(edge.to.as_str());
                }
            }
        }

        for edge in kept_edges {
            if subgraph.nodes.contains_key(&edge.from) && subgraph.nodes.contains_key(&edge.to) {
                subgraph.add_edge(edge.clone())?;
            }
        }
        Ok(subgraph)
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Filter by matcher, preserving DAG connectivity down to matches.
    ///
    /// A node is retained if it matches **or** has at least one retained
    /// descendant, so the ancestors needed to keep the graph connected down
    /// to a match survive even when they do not match themselves. Edges are
    /// retained only between two retained nodes. Completely non-matching
    /// components are dropped entirely.
    pub fn sub_collection(&self, matcher: &dyn Matcher) -> Result<Collection> {
        let mut retained: HashMap<&str, bool> = HashMap::new();
        for id in self.nodes.keys() {
            self.retains(id, matcher, &mut retained);
        }

        let mut filtered = Collection::new(self.reference.clone());
        for (id, node) in &self.nodes {
            if retained.get(id.as_str()).copied().unwrap_or(false) {
                filtered.add_node(node.clone())?;
            }
        }
        for edges in self.from.values() {
            for edge in edges {
                if filtered.nodes.contains_key(&edge.from)
                    && filtered.nodes.contains_key(&edge.to)
                {
                    filtered.add_edge(edge.clone())?;
                }
            }
        }
        Ok(filtered)
    }

    /// Memoized "this node or a descendant matches" with cycle safety:
    /// an in-flight node counts as non-matching until resolved.
    fn retains<'a>(
        &'a self,
        id: &'a str,
        matcher: &dyn Matcher,
        memo: &mut HashMap<&'a str, bool>,
    ) -> bool {
        if let Some(&known) = memo.get(id) {
            return known;
        }
        memo.insert(id, false);

        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let mut keep = matcher.matches(node);
        if !keep {
            for edge in self.from.get(id).into_iter().flatten() {
                if self.retains(edge.to.as_str(), matcher, memo) {
                    keep = true;
                    break;
                }
            }
        }
        memo.insert(id, keep);
        keep
    }

    /// Union of every node's attribute document, deep-merged in node-id
    /// order. Used to build schema-validation input for a whole collection.
    pub fn attributes(&self) -> Result<serde_json::Value> {
        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort_unstable();
        merge_documents(
            ids.into_iter()
                .map(|id| self.nodes[id].attributes.as_json()),
        )
    }
}

impl GraphView for Collection {
    fn from(&self, id: &str) -> Vec<Node> {
        Collection::from(self, id).into_iter().cloned().collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
