//! # Collection Data Model
//!
//! Clean DTOs that define the collection graph. These types cross every
//! boundary: loader ↔ graph ↔ matcher ↔ user.
//!
//! Design rule: NO registry types, NO transport types here.
//! This module is pure data — no I/O, no state, no async.

pub mod attribute;
pub mod attribute_set;
pub mod merge;
pub mod node;
pub mod edge;
pub mod descriptor;

pub use attribute::{Attribute, AttributeValue, Kind};
pub use attribute_set::AttributeSet;
pub use merge::merge_documents;
pub use node::Node;
pub use edge::Edge;
pub use descriptor::{
    ANNOTATION_ATTRIBUTES, ANNOTATION_LINKS, ANNOTATION_TITLE, Descriptor, LINKS_DELIMITER,
};
