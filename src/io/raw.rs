//! Raw XGBoost JSON tree dump decoding.
//!
//! A dump is a JSON array of trees, each a nested node object as written by
//! `Booster.dump_model(..., dump_format="json")`:
//!
//! ```json
//! [{ "nodeid": 0, "split": "f2", "split_condition": 2.45,
//!    "yes": 1, "no": 2, "missing": 1,
//!    "children": [{ "nodeid": 1, "leaf": 0.43 }, { "nodeid": 2, "leaf": -0.21 }] }]
//! ```
//!
//! Fields other than the ones below (`depth`, `gain`, `cover`, ...) are ignored.

use crate::core::error::{LoaderError, Result};
use crate::core::types::{NodeId, Score};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One node of a decoded tree, owning its children.
///
/// A node with a `children` field is a split, whatever its other fields say.
/// Missing fields take zero or empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Externally assigned identifier
    #[serde(default)]
    pub nodeid: NodeId,
    /// Feature identifier, either a feature-map name or `f<index>`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub split: String,
    /// Split threshold
    #[serde(default)]
    pub split_condition: Score,
    /// Child taken when the feature value is below the threshold
    #[serde(default)]
    pub yes: NodeId,
    /// Child taken otherwise
    #[serde(default)]
    pub no: NodeId,
    /// Child taken when the feature value is missing
    #[serde(default)]
    pub missing: NodeId,
    /// Leaf value
    #[serde(default)]
    pub leaf: Score,
    /// Nested child nodes; present only on splits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    /// Create a leaf node
    pub fn leaf(nodeid: NodeId, value: Score) -> Self {
        RawNode {
            nodeid,
            split: String::new(),
            split_condition: 0.0,
            yes: 0,
            no: 0,
            missing: 0,
            leaf: value,
            children: None,
        }
    }

    /// Create a split node whose `missing` branch follows `yes`
    pub fn split<S: Into<String>>(
        nodeid: NodeId,
        feature: S,
        threshold: Score,
        yes: RawNode,
        no: RawNode,
    ) -> Self {
        RawNode {
            nodeid,
            split: feature.into(),
            split_condition: threshold,
            yes: yes.nodeid,
            no: no.nodeid,
            missing: yes.nodeid,
            leaf: 0.0,
            children: Some(vec![yes, no]),
        }
    }

    /// Whether this node is a split
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }

    /// Child nodes, empty for leaves
    pub fn children(&self) -> &[RawNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of nodes in the subtree rooted here.
    pub fn node_count(&self) -> usize {
        let mut stack = vec![self];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

impl Drop for RawNode {
    // Flattens the subtree so dropping a deep chain does not recurse.
    fn drop(&mut self) {
        let mut pending = self.children.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children.take() {
                pending.extend(children);
            }
        }
    }
}

/// Decode a tree dump from any reader.
///
/// Nesting depth is unbounded: the decoder grows its stack on demand instead
/// of applying serde_json's recursion limit. `path` is only used to label
/// errors.
pub fn decode_trees<R: Read>(reader: R, path: &Path) -> Result<Vec<RawNode>> {
    let decode_error = |source| LoaderError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut de = serde_json::Deserializer::from_reader(reader);
    de.disable_recursion_limit();
    let trees = Vec::<RawNode>::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(decode_error)?;
    de.end().map_err(decode_error)?;
    Ok(trees)
}

/// Open and decode a tree dump, rejecting dumps without trees.
///
/// The file is closed before this returns, on every path.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<Vec<RawNode>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoaderError::io(path, e))?;
    let trees = decode_trees(BufReader::new(file), path)?;

    if trees.is_empty() {
        return Err(LoaderError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    log::debug!("Decoded {} raw trees from {}", trees.len(), path.display());
    Ok(trees)
}
