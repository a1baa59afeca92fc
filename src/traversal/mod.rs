//! # Traversal Engine
//!
//! Generic, budgeted, cancellable walking of any graph-like structure.
//! The engine only knows the [`GraphView`] adjacency contract — never a
//! concrete graph type — plus an optional per-node lazy-expansion
//! capability ([`Expander`]).
//!
//! A single `walk`/`walk_bfs` invocation is sequential and owns its seen
//! set exclusively; the same `Tracker` must not be driven from two call
//! sites concurrently. The [`Budget`], by contrast, is atomic and designed
//! to be shared across independent concurrent traversals.

pub mod budget;
pub mod status;

use std::collections::VecDeque;

use hashbrown::HashSet;
use tracing::trace;

use crate::model::Node;
use crate::{Error, Result};

pub use budget::Budget;
pub use status::StatusMap;

// ============================================================================
// Contracts
// ============================================================================

/// The adjacency contract a graph exposes to the engine: the nodes
/// reachable by one hop via outgoing edges.
pub trait GraphView {
    fn from(&self, id: &str) -> Vec<Node>;
}

/// Optional per-node capability: lazily yield additional sub-nodes beyond
/// the structural successors. `None` marks a plain node. The returned
/// sequence must be finite and restartable (calling `expand` twice for the
/// same node yields the same nodes).
pub trait Expander {
    fn expand(&self, node: &Node) -> Option<Vec<Node>>;
}

// ============================================================================
// Tracker
// ============================================================================

/// Bundles a graph, an optional shared budget, and the seen set for one
/// traversal.
///
/// The seen set handles cycles and diamonds: a node already seen is never
/// revisited or re-emitted, and the seen-check does not consume budget.
pub struct Tracker<'a> {
    graph: &'a dyn GraphView,
    budget: Option<&'a Budget>,
    expander: Option<&'a dyn Expander>,
    seen: HashSet<String>,
}

impl<'a> Tracker<'a> {
    pub fn new(graph: &'a dyn GraphView) -> Self {
        Self { graph, budget: None, expander: None, seen: HashSet::new() }
    }

    /// Share a node-visit cap with this traversal. `Budget` is atomic, so
    /// the same instance may simultaneously cap other traversals.
    pub fn with_budget(mut self, budget: &'a Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_expander(mut self, expander: &'a dyn Expander) -> Self {
        self.expander = Some(expander);
        self
    }

    /// Whether `id` has been visited by this tracker.
    pub fn seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Depth-first walk from `root`.
    ///
    /// Visit contract, shared with [`walk_bfs`](Self::walk_bfs): pop, skip
    /// if seen, charge the budget, mark seen, invoke the visitor, then
    /// enqueue structural successors followed by lazily expanded nodes.
    /// Because this is a stack, expanded nodes are visited before
    /// previously pushed structural siblings.
    ///
    /// A visitor returning [`Error::Skip`] terminates the walk early and
    /// successfully; any other error aborts and propagates verbatim.
    pub fn walk<F>(&mut self, root: &Node, mut visitor: F) -> Result<()>
    where
        F: FnMut(&Node) -> Result<()>,
    {
        let mut stack: Vec<Node> = vec![root.clone()];
        while let Some(node) = stack.pop() {
            match self.visit(&node, &mut visitor)? {
                Visit::AlreadySeen => continue,
                Visit::Stop => return Ok(()),
                Visit::Continue => {}
            }
            for successor in self.graph.from(&node.id) {
                stack.push(successor);
            }
            if let Some(expanded) = self.expander.and_then(|e| e.expand(&node)) {
                for sub_node in expanded {
                    stack.push(sub_node);
                }
            }
        }
        Ok(())
    }

    /// Breadth-first walk from `root` — identical visit contract to
    /// [`walk`](Self::walk) over a FIFO queue, so nodes are visited in
    /// non-decreasing shortest-hop order. A node reachable via two parents
    /// at the same depth is visited exactly once, whichever parent is
    /// dequeued first.
    pub fn walk_bfs<F>(&mut self, root: &Node, mut visitor: F) -> Result<()>
    where
        F: FnMut(&Node) -> Result<()>,
    {
        let mut queue: VecDeque<Node> = VecDeque::from([root.clone()]);
        while let Some(node) = queue.pop_front() {
            match self.visit(&node, &mut visitor)? {
                Visit::AlreadySeen => continue,
                Visit::Stop => return Ok(()),
                Visit::Continue => {}
            }
            for successor in self.graph.from(&node.id) {
                queue.push_back(successor);
            }
            if let Some(expanded) = self.expander.and_then(|e| e.expand(&node)) {
                for sub_node in expanded {
                    queue.push_back(sub_node);
                }
            }
        }
        Ok(())
    }

    /// The shared per-node visit step: seen-check (free), budget charge,
    /// mark seen, invoke visitor.
    fn visit<F>(&mut self, node: &Node, visitor: &mut F) -> Result<Visit>
    where
        F: FnMut(&Node) -> Result<()>,
    {
        if self.seen.contains(&node.id) {
            return Ok(Visit::AlreadySeen);
        }
        if let Some(budget) = self.budget {
            if !budget.consume() {
                return Err(Error::BudgetExceeded(node.address.clone()));
            }
        }
        self.seen.insert(node.id.clone());
        trace!(id = %node.id, address = %node.address, "visiting node");
        match visitor(node) {
            Ok(()) => Ok(Visit::Continue),
            Err(Error::Skip) => Ok(Visit::Stop),
            Err(other) => Err(other),
        }
    }
}

enum Visit {
    Continue,
    AlreadySeen,
    Stop,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::model::Edge;

    fn node(id: &str) -> Node {
        Node::new(id, id)
    }

    /// root -> {a, b}, a -> c, b -> c.
    fn diamond() -> Collection {
        let mut graph = Collection::new("test");
        for id in ["root", "a", "b", "c"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge(Edge::new("root", "a")).unwrap();
        graph.add_edge(Edge::new("root", "b")).unwrap();
        graph.add_edge(Edge::new("a", "c")).unwrap();
        graph.add_edge(Edge::new("b", "c")).unwrap();
        graph
    }

    #[test]
    fn test_walk_visits_each_node_once() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let mut visited = Vec::new();
        Tracker::new(&graph)
            .walk(&root, |n| {
                visited.push(n.id.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(visited.len(), 4, "diamond node c visited once: {visited:?}");
    }

    #[test]
    fn test_walk_dfs_expanded_before_siblings() {
        struct RootExpander;
        impl Expander for RootExpander {
            fn expand(&self, node: &Node) -> Option<Vec<Node>> {
                (node.id == "root").then(|| vec![Node::new("lazy", "lazy")])
            }
        }

        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let expander = RootExpander;
        let mut visited = Vec::new();
        Tracker::new(&graph)
            .with_expander(&expander)
            .walk(&root, |n| {
                visited.push(n.id.clone());
                Ok(())
            })
            .unwrap();

        // expanded nodes are pushed after successors, so the stack pops
        // "lazy" before the structural children of root
        assert_eq!(visited[0], "root");
        assert_eq!(visited[1], "lazy");
        assert_eq!(visited.len(), 5);
    }

    #[test]
    fn test_walk_bfs_shortest_hop_order() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let mut visited = Vec::new();
        Tracker::new(&graph)
            .walk_bfs(&root, |n| {
                visited.push(n.id.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited.len(), 4);
        assert_eq!(visited[0], "root");
        // depth-1 nodes before the depth-2 node
        assert_eq!(visited[3], "c");
    }

    #[test]
    fn test_walk_survives_cycles() {
        let mut graph = Collection::new("test");
        for id in ["a", "b"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge(Edge::new("a", "b")).unwrap();
        graph.add_edge(Edge::new("b", "a")).unwrap();

        let mut count = 0;
        Tracker::new(&graph)
            .walk(&node("a"), |_| {
                count += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_skip_sentinel_stops_successfully() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let mut count = 0;
        Tracker::new(&graph)
            .walk(&root, |_| {
                count += 1;
                if count == 2 { Err(Error::Skip) } else { Ok(()) }
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_visitor_error_propagates_verbatim() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let err = Tracker::new(&graph)
            .walk(&root, |_| Err(Error::NoRoot))
            .unwrap_err();
        assert!(matches!(err, Error::NoRoot));
    }

    #[test]
    fn test_zero_budget_visits_nothing() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let budget = Budget::new(0);
        let mut count = 0;
        let err = Tracker::new(&graph)
            .with_budget(&budget)
            .walk(&root, |_| {
                count += 1;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(count, 0);
        assert_eq!(err.to_string(), "traversal budget exceeded at node root");
    }

    #[test]
    fn test_budget_exhausts_midway() {
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        let budget = Budget::new(2);
        let mut count = 0;
        let err = Tracker::new(&graph)
            .with_budget(&budget)
            .walk_bfs(&root, |_| {
                count += 1;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(count, 2);
        assert!(matches!(err, Error::BudgetExceeded(_)));
    }

    #[test]
    fn test_seen_check_does_not_consume_budget() {
        // a -> b, a -> b twice via diamond shape: revisits must be free
        let graph = diamond();
        let root = graph.root().unwrap().clone();
        // exactly as many visits as distinct nodes
        let budget = Budget::new(4);
        Tracker::new(&graph)
            .with_budget(&budget)
            .walk(&root, |_| Ok(()))
            .unwrap();
        assert_eq!(budget.remaining(), 0);
    }
}
