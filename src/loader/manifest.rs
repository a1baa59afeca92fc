//! Wire shapes of the manifest kinds the loader understands.
//!
//! Only the fields that drive successor resolution are modeled; everything
//! else in a manifest is ignored on decode.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{ANNOTATION_ATTRIBUTES, ANNOTATION_TITLE, Descriptor};

// ============================================================================
// Media types
// ============================================================================

pub const MEDIA_TYPE_DOCKER_MANIFEST: &str =
    "application/vnd.docker.distribution.manifest.v2+json";
pub const MEDIA_TYPE_DOCKER_MANIFEST_LIST: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
pub const MEDIA_TYPE_IMAGE_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const MEDIA_TYPE_IMAGE_INDEX: &str = "application/vnd.oci.image.index.v1+json";
pub const MEDIA_TYPE_ARTIFACT_MANIFEST: &str = "application/vnd.oci.artifact.manifest.v1+json";
pub const MEDIA_TYPE_COLLECTION_MANIFEST: &str = "application/vnd.collection.manifest.v1+json";

// ============================================================================
// Manifest shapes
// ============================================================================

/// Image manifest (docker v2 or OCI). Successors: config ∪ layers.
#[derive(Debug, Deserialize)]
pub struct ImageManifest {
    pub config: Descriptor,
    #[serde(default)]
    pub layers: Vec<Descriptor>,
}

/// Image index / docker manifest list. Successors: the listed manifests.
#[derive(Debug, Deserialize)]
pub struct ImageIndex {
    #[serde(default)]
    pub manifests: Vec<Descriptor>,
}

/// OCI artifact manifest. Successors: subject (if present) ∪ blobs.
#[derive(Debug, Deserialize)]
pub struct ArtifactManifest {
    pub subject: Option<Descriptor>,
    #[serde(default)]
    pub blobs: Vec<Descriptor>,
}

/// Collection manifest (custom type). Successors: the blob entries, each
/// translated from the collection-specific descriptor shape into the
/// graph's [`Descriptor`].
#[derive(Debug, Deserialize)]
pub struct CollectionManifest {
    #[serde(default)]
    pub blobs: Vec<CollectionBlob>,
}

/// Collection-specific blob entry: attributes live inline as a JSON
/// document instead of inside annotations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionBlob {
    pub digest: String,
    pub media_type: String,
    pub size: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
}

impl CollectionBlob {
    /// Translate into the graph's descriptor shape: inline attributes are
    /// re-encoded under the reserved attributes annotation.
    pub fn into_descriptor(self) -> Descriptor {
        let mut descriptor = Descriptor::new(self.digest, self.media_type, self.size);
        if let Some(title) = self.title {
            descriptor = descriptor.with_annotation(ANNOTATION_TITLE, title);
        }
        if !self.attributes.is_empty() {
            descriptor = descriptor.with_annotation(
                ANNOTATION_ATTRIBUTES,
                Value::Object(self.attributes).to_string(),
            );
        }
        descriptor
    }
}
