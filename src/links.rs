//! # Link Resolver — collection-of-collections closure
//!
//! Collections may reference other collections through a reserved
//! annotation on their root manifest. Resolution is a breadth-first
//! closure over *reference strings* (not graph node IDs): start with the
//! origin, pop a pending reference, skip if visited, resolve its links,
//! enqueue the new ones.

use std::collections::VecDeque;

use async_trait::async_trait;
use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::model::{ANNOTATION_LINKS, LINKS_DELIMITER};
use crate::{Error, Result};

// ============================================================================
// Lookup contract
// ============================================================================

/// Externally supplied "resolve links for reference" capability.
#[async_trait]
pub trait LinkLookup: Send + Sync {
    /// The references linked from `reference`. Returns the
    /// [`Error::NoLinks`] sentinel when the reference carries no links
    /// annotation — the resolver treats that as zero links, not a failure.
    async fn links(&self, reference: &str) -> Result<Vec<String>>;
}

// ============================================================================
// Resolution
// ============================================================================

/// Transitive closure of linked references reachable from `origin`,
/// excluding the origin itself, in breadth-first discovery order.
///
/// `NoLinks` from the lookup yields zero links for that reference; any
/// other error aborts resolution and is propagated.
pub async fn resolve_links(origin: &str, lookup: &dyn LinkLookup) -> Result<Vec<String>> {
    let mut enqueued: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut discovered: Vec<String> = Vec::new();

    enqueued.insert(origin.to_owned());
    queue.push_back(origin.to_owned());

    while let Some(reference) = queue.pop_front() {
        let links = match lookup.links(&reference).await {
            Ok(links) => links,
            Err(Error::NoLinks) => Vec::new(),
            Err(other) => return Err(other),
        };
        debug!(reference = %reference, links = links.len(), "resolved links");
        for link in links {
            if enqueued.insert(link.clone()) {
                discovered.push(link.clone());
                queue.push_back(link);
            }
        }
    }
    Ok(discovered)
}

/// Parse the reserved links annotation into reference strings. Absence is
/// the [`Error::NoLinks`] terminal condition.
pub fn links_from_annotations(annotations: &HashMap<String, String>) -> Result<Vec<String>> {
    let raw = annotations.get(ANNOTATION_LINKS).ok_or(Error::NoLinks)?;
    Ok(raw
        .split(LINKS_DELIMITER)
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(str::to_owned)
        .collect())
}
