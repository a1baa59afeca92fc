//! # Manifest Loader
//!
//! Incrementally materializes a [`Collection`] by walking a remote
//! descriptor tree through an injected [`Fetcher`] capability. Successors
//! of a descriptor are resolved by its declared media type; unknown media
//! types are leaves.
//!
//! Cancellation is expressed through the fetcher: dropping the `load`
//! future, or a fetcher that observes its own cancellation signal and
//! returns an error, aborts the build on the next visit. The loader has no
//! timeout of its own beyond whatever budget its caller enforces.

pub mod manifest;

use async_trait::async_trait;
use bytes::Bytes;
use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::debug;

use crate::collection::Collection;
use crate::model::{ANNOTATION_ATTRIBUTES, AttributeSet, Descriptor, Edge, Node};
use crate::{Error, Result};

pub use manifest::{
    MEDIA_TYPE_ARTIFACT_MANIFEST, MEDIA_TYPE_COLLECTION_MANIFEST, MEDIA_TYPE_DOCKER_MANIFEST,
    MEDIA_TYPE_DOCKER_MANIFEST_LIST, MEDIA_TYPE_IMAGE_INDEX, MEDIA_TYPE_IMAGE_MANIFEST,
};

// ============================================================================
// Fetcher contract
// ============================================================================

/// The injected fetch capability, supplied by an external registry client.
///
/// Must be deterministic per digest and safe to call repeatedly — the
/// loader may request the same descriptor from multiple call sites before
/// deduplication catches up. The implementation may fetch independent
/// branches with internal concurrency as long as it honors cancellation
/// and stays deterministic.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, descriptor: &Descriptor) -> Result<Bytes>;
}

// ============================================================================
// ManifestLoader
// ============================================================================

/// Builds or extends a `Collection` from a root descriptor.
pub struct ManifestLoader<F: Fetcher> {
    fetcher: F,
}

/// Successor lists are almost always small (config + a few layers).
type Successors = SmallVec<[Descriptor; 4]>;

impl<F: Fetcher> ManifestLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Access the underlying fetcher (for advanced use).
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Build a fresh collection for `reference` rooted at `root`.
    pub async fn load(&self, reference: &str, root: Descriptor) -> Result<Collection> {
        let mut collection = Collection::new(reference);
        self.load_into(root, &mut collection).await?;
        Ok(collection)
    }

    /// Walk the descriptor tree under `root`, adding nodes and edges to
    /// `collection`. Nodes are keyed by digest and created idempotently —
    /// a digest already present is reused, never duplicated. A per-walk
    /// seen set prevents re-resolving successors of a descriptor reachable
    /// from multiple parents.
    ///
    /// The collection must not be queried concurrently while this runs;
    /// once it returns, the collection is read-only and freely shareable.
    pub async fn load_into(&self, root: Descriptor, collection: &mut Collection) -> Result<()> {
        self.ensure_node(&root, collection)?;

        let mut expanded: HashSet<String> = HashSet::new();
        let mut stack: Vec<Descriptor> = vec![root];

        while let Some(descriptor) = stack.pop() {
            if !expanded.insert(descriptor.digest.clone()) {
                continue;
            }
            let successors = self.successors(&descriptor).await?;
            debug!(
                digest = %descriptor.digest,
                media_type = %descriptor.media_type,
                successors = successors.len(),
                "resolved descriptor"
            );
            for successor in successors {
                self.ensure_node(&successor, collection)?;
                collection.add_edge(Edge::new(&descriptor.digest, &successor.digest))?;
                stack.push(successor);
            }
        }
        Ok(())
    }

    /// Look up or create the graph node for `descriptor`.
    fn ensure_node(&self, descriptor: &Descriptor, collection: &mut Collection) -> Result<()> {
        if collection.node_by_id(&descriptor.digest).is_some() {
            return Ok(());
        }
        collection.add_node(node_from_descriptor(descriptor)?)
    }

    /// Media-type-specific successor resolution. Descriptors of unknown
    /// media types are leaves, not errors.
    async fn successors(&self, descriptor: &Descriptor) -> Result<Successors> {
        match descriptor.media_type.as_str() {
            MEDIA_TYPE_IMAGE_MANIFEST | MEDIA_TYPE_DOCKER_MANIFEST => {
                let manifest: manifest::ImageManifest = self.fetch_decoded(descriptor).await?;
                let mut successors = Successors::new();
                successors.push(manifest.config);
                successors.extend(manifest.layers);
                Ok(successors)
            }
            MEDIA_TYPE_IMAGE_INDEX | MEDIA_TYPE_DOCKER_MANIFEST_LIST => {
                let index: manifest::ImageIndex = self.fetch_decoded(descriptor).await?;
                Ok(index.manifests.into_iter().collect())
            }
            MEDIA_TYPE_ARTIFACT_MANIFEST => {
                let manifest: manifest::ArtifactManifest = self.fetch_decoded(descriptor).await?;
                let mut successors = Successors::new();
                successors.extend(manifest.subject);
                successors.extend(manifest.blobs);
                Ok(successors)
            }
            MEDIA_TYPE_COLLECTION_MANIFEST => {
                let manifest: manifest::CollectionManifest =
                    self.fetch_decoded(descriptor).await?;
                Ok(manifest
                    .blobs
                    .into_iter()
                    .map(manifest::CollectionBlob::into_descriptor)
                    .collect())
            }
            _ => Ok(Successors::new()),
        }
    }

    async fn fetch_decoded<T: serde::de::DeserializeOwned>(
        &self,
        descriptor: &Descriptor,
    ) -> Result<T> {
        let payload = self.fetcher.fetch(descriptor).await?;
        serde_json::from_slice(&payload).map_err(|source| Error::ManifestDecode {
            digest: descriptor.digest.clone(),
            source,
        })
    }
}

/// Build a graph node from a descriptor: digest identity, title-or-digest
/// address, attributes decoded from the reserved annotation.
fn node_from_descriptor(descriptor: &Descriptor) -> Result<Node> {
    let mut attributes = AttributeSet::new();
    if let Some(raw) = descriptor.annotations.get(ANNOTATION_ATTRIBUTES) {
        let document: serde_json::Value = serde_json::from_str(raw)?;
        attributes = AttributeSet::from_json(&document)?;
    }
    Ok(Node::new(&descriptor.digest, descriptor.address())
        .with_attributes(attributes)
        .with_descriptor(descriptor.clone()))
}
