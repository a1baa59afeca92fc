//! # collection-graph — Content-Addressed Artifact Collections
//!
//! Organizes content-addressed artifacts into **collections**: directed
//! acyclic graphs whose nodes carry typed, queryable attributes and whose
//! edges mirror the containment structure of a remote manifest tree.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Fetcher` and `LinkLookup` are the contracts between
//!    the graph core and any registry client
//! 2. **Clean DTOs**: `Node`, `Edge`, `Attribute`, `Descriptor` cross all
//!    boundaries
//! 3. **Build-then-query**: a `Collection` is populated monotonically in a
//!    single pass, then read-only forever
//! 4. **Engine-agnostic traversal**: the `Tracker` only knows `GraphView`
//!    adjacency, never a concrete graph type
//!
//! ## Quick Start
//!
//! ```rust
//! use collection_graph::{Attribute, AttributeSet, Collection, Edge, Node};
//!
//! # fn example() -> collection_graph::Result<()> {
//! let mut attrs = AttributeSet::new();
//! attrs.insert(Attribute::new_string("kind", "txt"));
//!
//! let mut graph = Collection::new("registry.example/library/docs:latest");
//! graph.add_node(Node::new("sha256:aaa", "root").with_attributes(attrs))?;
//! graph.add_node(Node::new("sha256:bbb", "root/readme.txt"))?;
//! graph.add_edge(Edge::new("sha256:aaa", "sha256:bbb"))?;
//!
//! let root = graph.root()?;
//! assert_eq!(root.address, "root");
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Data  | `model` | Attributes, nodes, edges, descriptors |
//! | Graph | `collection` | The DAG: adjacency, root inference, subgraphs |
//! | Query | `matcher` | Partial/exact attribute predicates |
//! | Walk  | `traversal` | Budgeted, cancellable DFS/BFS engine |
//! | Build | `loader` | Materialize a Collection from a manifest tree |
//! | Link  | `links` | Cross-collection reference closure |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod collection;
pub mod matcher;
pub mod traversal;
pub mod loader;
pub mod links;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Attribute, AttributeSet, AttributeValue, Descriptor, Edge, Kind, Node,
    merge_documents,
};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use collection::Collection;

// ============================================================================
// Re-exports: Query
// ============================================================================

pub use matcher::{ExactAttributeMatcher, Matcher, PartialAttributeMatcher};

// ============================================================================
// Re-exports: Traversal
// ============================================================================

pub use traversal::{Budget, Expander, GraphView, StatusMap, Tracker};

// ============================================================================
// Re-exports: Loader & Links
// ============================================================================

pub use loader::{Fetcher, ManifestLoader};
pub use links::{LinkLookup, resolve_links};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A node with this ID is already present in the collection.
    #[error("node with id \"{0}\" already exists in graph")]
    DuplicateNode(String),

    /// An edge endpoint references a node absent from the collection.
    #[error("node \"{0}\" does not exist in graph")]
    MissingNode(String),

    #[error("no root found in graph")]
    NoRoot,

    /// Candidate addresses, sorted lexicographically and `", "`-joined.
    #[error("multiple roots found in graph: {0}")]
    MultipleRoots(String),

    /// The shared node-visit budget ran out; carries the offending node's
    /// address.
    #[error("traversal budget exceeded at node {0}")]
    BudgetExceeded(String),

    /// Sentinel: a visitor returning this terminates the walk early and
    /// **successfully**. Never surfaced to callers of `walk`/`walk_bfs`.
    #[error("skip node")]
    Skip,

    /// Typed attribute accessed as the wrong kind. No coercion is attempted.
    #[error("attribute \"{key}\" is kind {got}, expected {expected}")]
    WrongKind {
        key: String,
        expected: model::Kind,
        got: model::Kind,
    },

    /// Deep-merge type mismatch: the accumulator holds an object but the
    /// patch holds a non-object at the dotted key path.
    #[error("patch value must be object for key \"{0}\"")]
    MergePatch(String),

    /// Aggregate of every attribute-parse failure in one document, rather
    /// than failing fast on the first.
    #[error("invalid attribute(s): {0}")]
    InvalidAttributes(String),

    /// Sentinel: the reference carries no links annotation. Recoverable —
    /// the link resolver treats it as zero links, not a failure.
    #[error("no links annotation found")]
    NoLinks,

    #[error("fetch failed for {digest}: {reason}")]
    Fetch { digest: String, reason: String },

    #[error("failed to decode manifest {digest}: {source}")]
    ManifestDecode {
        digest: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
