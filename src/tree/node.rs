//! Flattened tree node.
//!
//! A node is either a leaf carrying a value, or a split carrying a resolved
//! feature index, a threshold and the array positions of its three branches.

use crate::core::types::{FeatureIndex, NodeId, NodeIndex, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node of a flattened tree. Child references are positions in the owning
/// [`Tree`](crate::tree::Tree)'s node array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node
    Leaf {
        /// Identifier from the model file
        id: NodeId,
        /// Contribution to the raw score
        value: Score,
    },
    /// Internal node
    Split {
        /// Identifier from the model file
        id: NodeId,
        /// Resolved feature column
        feature: FeatureIndex,
        /// Values below the threshold go to `yes`
        threshold: Score,
        /// Branch for values below the threshold
        yes: NodeIndex,
        /// Branch for all other values
        no: NodeIndex,
        /// Branch for missing values
        missing: NodeIndex,
    },
}

impl Node {
    /// Identifier from the model file.
    pub fn id(&self) -> NodeId {
        match *self {
            Node::Leaf { id, .. } | Node::Split { id, .. } => id,
        }
    }

    /// Returns true if this node is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Leaf value, for leaves.
    pub fn leaf_value(&self) -> Option<Score> {
        match *self {
            Node::Leaf { value, .. } => Some(value),
            Node::Split { .. } => None,
        }
    }

    /// Split feature, for splits.
    pub fn feature(&self) -> Option<FeatureIndex> {
        match *self {
            Node::Split { feature, .. } => Some(feature),
            Node::Leaf { .. } => None,
        }
    }

    /// Split threshold, for splits.
    pub fn threshold(&self) -> Option<Score> {
        match *self {
            Node::Split { threshold, .. } => Some(threshold),
            Node::Leaf { .. } => None,
        }
    }

    /// `[yes, no, missing]` branch positions, for splits.
    pub fn branches(&self) -> Option<[NodeIndex; 3]> {
        match *self {
            Node::Split {
                yes, no, missing, ..
            } => Some([yes, no, missing]),
            Node::Leaf { .. } => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf { id, value } => write!(f, "{}:leaf={:.6}", id, value),
            Node::Split {
                id,
                feature,
                threshold,
                yes,
                no,
                missing,
            } => write!(
                f,
                "{}:[f{}<{:.6}] yes={},no={},missing={}",
                id, feature, threshold, yes, no, missing
            ),
        }
    }
}
