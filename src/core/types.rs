//! Core data types for the XGBoost ensemble loader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved feature column index.
pub type FeatureIndex = usize;

/// Externally assigned node identifier, as written in the `nodeid` field.
pub type NodeId = usize;

/// Position of a node inside its owning tree's node array.
pub type NodeIndex = usize;

/// Threshold and leaf value type. XGBoost dumps are written in double precision.
pub type Score = f64;

/// Allocation strategy the tree builder uses for one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Pre-sized array of `2^(depth+1) - 1` slots addressed by node id
    DepthHinted {
        /// Caller supplied upper bound on tree depth
        depth: u32,
    },
    /// Growable array sorted by node id once traversal finishes
    SortById,
}

impl Placement {
    /// Pick the strategy for a validated, non-negative depth hint.
    pub fn from_depth_hint(depth: u32) -> Self {
        if depth == 0 {
            Placement::SortById
        } else {
            Placement::DepthHinted { depth }
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::DepthHinted { depth } => write!(f, "depth-hinted({})", depth),
            Placement::SortById => write!(f, "sort-by-id"),
        }
    }
}
