//! Content-addressed descriptor of an external blob.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// An external, content-addressed reference (digest + media type + size)
/// to a blob in a remote artifact store. Drives successor resolution in
/// the manifest loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub digest: String,
    pub media_type: String,
    pub size: u64,
    /// Raw annotations from the manifest entry. Reserved keys carry the
    /// JSON-encoded attribute set and the linked-collection references.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

impl Descriptor {
    pub fn new(digest: impl Into<String>, media_type: impl Into<String>, size: u64) -> Self {
        Self {
            digest: digest.into(),
            media_type: media_type.into(),
            size,
            annotations: HashMap::new(),
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// The human-meaningful address of a descriptor: its title annotation
    /// when present, its digest otherwise.
    pub fn address(&self) -> &str {
        self.annotations
            .get(ANNOTATION_TITLE)
            .map_or(&self.digest, String::as_str)
    }
}

/// Standard OCI title annotation, used as node address when present.
pub const ANNOTATION_TITLE: &str = "org.opencontainers.image.title";

/// Reserved annotation holding the JSON-encoded attribute set of a node.
pub const ANNOTATION_ATTRIBUTES: &str = "collection.attributes";

/// Reserved annotation holding the linked-collection references, joined
/// with [`LINKS_DELIMITER`]. Absence is the "no links" terminal condition,
/// not an error.
pub const ANNOTATION_LINKS: &str = "collection.links";

/// Separator for the [`ANNOTATION_LINKS`] reference list.
pub const LINKS_DELIMITER: &str = ",";
