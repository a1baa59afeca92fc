//! Deep document merge over generic JSON values.
//!
//! Attribute sets serialize to flat JSON objects, but merge inputs may be
//! arbitrary documents (schema-validation input construction builds nested
//! shapes). The merge therefore operates on `serde_json::Value`, the tagged
//! union `Null | Bool | Number | String | Array | Object`, as a typed
//! recursive function — no runtime downcasting.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Fold `documents` left-to-right with a patch-merge.
///
/// For a key present in both the accumulator and the next document:
/// - both values JSON objects → recurse key-by-key;
/// - accumulator array, patch object → array indices are treated as object
///   keys and merged per-index;
/// - accumulator object, patch non-object → [`Error::MergePatch`] carrying
///   the dot-joined key path;
/// - otherwise the patch value overwrites the accumulator's.
///
/// Zero documents yield an empty object. The merge is **not** associative
/// across differing document shapes; callers folding more than two
/// documents must rely on the left-to-right order.
pub fn merge_documents(documents: impl IntoIterator<Item = Value>) -> Result<Value> {
    let mut accumulator = Value::Object(Map::new());
    for document in documents {
        match document {
            Value::Object(patch) if accumulator.is_object() => {
                let mut path = Vec::new();
                patch_object(&mut accumulator, patch, &mut path)?;
            }
            // A non-object document replaces the whole accumulator.
            document => accumulator = document,
        }
    }
    Ok(accumulator)
}

/// Merge `patch` into `accumulator`, which must be an object or an array
/// (array indices act as object keys).
fn patch_object(
    accumulator: &mut Value,
    patch: Map<String, Value>,
    path: &mut Vec<String>,
) -> Result<()> {
    for (key, patch_value) in patch {
        path.push(key.clone());
        match accumulator {
            Value::Object(map) => match map.get_mut(&key) {
                Some(existing) => patch_key(existing, patch_value, path)?,
                None => {
                    map.insert(key, patch_value);
                }
            },
            Value::Array(items) => {
                let slot = key
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get_mut(index))
                    .ok_or_else(|| Error::MergePatch(dotted(path)))?;
                patch_key(slot, patch_value, path)?;
            }
            // Callers guarantee an object or array accumulator.
            _ => return Err(Error::MergePatch(dotted(path))),
        }
        path.pop();
    }
    Ok(())
}

fn patch_key(existing: &mut Value, patch_value: Value, path: &mut Vec<String>) -> Result<()> {
    match patch_value {
        Value::Object(patch) if existing.is_object() || existing.is_array() => {
            patch_object(existing, patch, path)
        }
        _ if existing.is_object() => Err(Error::MergePatch(dotted(path))),
        patch_value => {
            *existing = patch_value;
            Ok(())
        }
    }
}

fn dotted(path: &[String]) -> String {
    path.join(".")
}
