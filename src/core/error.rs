//! Error handling and error types for the XGBoost ensemble loader.
//!
//! Every failure is terminal to the load call that produced it. Variants carry
//! enough context (file path, tree position, node identifier, feature name) to
//! be acted upon without re-running the load with extra diagnostics.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::types::NodeId;

/// Main error type for the loader.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Model or feature-map file could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Model file is not a valid JSON tree dump
    #[error("failed to decode model {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Model file decoded to zero trees
    #[error("no trees in model file {}", path.display())]
    EmptyModel { path: PathBuf },

    /// Declared class count is zero or negative
    #[error("num classes must be greater than 0, got {num_classes}")]
    InvalidClassCount { num_classes: i64 },

    /// Depth hint is negative or too large to pre-size
    #[error("invalid max depth {depth}: {reason}")]
    InvalidDepth { depth: i64, reason: String },

    /// Tree count not evenly divisible by class count
    #[error("wrong number of trees for number of classes (trees={trees}, classes={classes})")]
    TreeClassMismatch { trees: usize, classes: usize },

    /// Feature-map line is not `<index> <name> <type>`
    #[error("malformed feature map {} at line {line}: {reason}", path.display())]
    MalformedMapping {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Feature name occurs more than once in the feature map
    #[error("duplicate feature name '{name}' in feature map {} at line {line}", path.display())]
    DuplicateFeatureName {
        path: PathBuf,
        line: usize,
        name: String,
    },

    /// Split references a feature absent from the feature map
    #[error("cannot find feature '{name}' in feature map")]
    UnknownFeature { name: String },

    /// Split feature does not follow the `<marker><digits>` convention
    #[error("invalid feature name '{name}': expected a marker character followed by digits, e.g. f0")]
    InvalidFeatureName { name: String },

    /// Node identifier does not fit the array sized from the depth hint
    #[error(
        "wrong tree max depth {depth}: node {node_id} does not fit in {capacity} slots, \
         use a larger max depth or 0 for unknown depth"
    )]
    DepthCapacityExceeded {
        depth: u32,
        node_id: NodeId,
        capacity: usize,
    },

    /// Two nodes of one tree share an identifier
    #[error("duplicate node id {node_id}")]
    DuplicateNodeId { node_id: NodeId },

    /// Split child reference does not name one of its own children
    #[error("node {node_id} references child {child} which is not one of its children")]
    InvalidChildReference { node_id: NodeId, child: NodeId },

    /// Root node does not have the smallest identifier
    #[error("root node {node_id} does not map to position 0")]
    MisplacedRoot { node_id: NodeId },

    /// Loader configuration could not be read or parsed
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Per-tree failure, tagged with the tree's position in the model
    #[error("error while reading tree {tree}: {source}")]
    InTree {
        tree: usize,
        #[source]
        source: Box<LoaderError>,
    },
}

/// Type alias for Results using LoaderError
pub type Result<T> = std::result::Result<T, LoaderError>;

impl LoaderError {
    /// Create an I/O error bound to a path
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        LoaderError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed feature-map error
    pub fn malformed_mapping<P, S>(path: P, line: usize, reason: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        LoaderError::MalformedMapping {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid depth error
    pub fn invalid_depth<S: Into<String>>(depth: i64, reason: S) -> Self {
        LoaderError::InvalidDepth {
            depth,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        LoaderError::Config {
            message: message.into(),
        }
    }

    /// Tag this error with the position of the tree that produced it.
    pub fn in_tree(self, tree: usize) -> Self {
        LoaderError::InTree {
            tree,
            source: Box::new(self),
        }
    }

    /// The underlying error with any tree tagging removed.
    pub fn root_cause(&self) -> &LoaderError {
        let mut err = self;
        while let LoaderError::InTree { source, .. } = err {
            err = source;
        }
        err
    }

    /// Position of the failing tree, if the error came from one.
    pub fn tree_index(&self) -> Option<usize> {
        match self {
            LoaderError::InTree { tree, .. } => Some(*tree),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            LoaderError::Io { .. } => "io",
            LoaderError::Decode { .. } => "decode",
            LoaderError::EmptyModel { .. } => "empty_model",
            LoaderError::InvalidClassCount { .. } => "invalid_class_count",
            LoaderError::InvalidDepth { .. } => "invalid_depth",
            LoaderError::TreeClassMismatch { .. } => "tree_class_mismatch",
            LoaderError::MalformedMapping { .. } => "malformed_mapping",
            LoaderError::DuplicateFeatureName { .. } => "duplicate_feature_name",
            LoaderError::UnknownFeature { .. } => "unknown_feature",
            LoaderError::InvalidFeatureName { .. } => "invalid_feature_name",
            LoaderError::DepthCapacityExceeded { .. } => "depth_capacity_exceeded",
            LoaderError::DuplicateNodeId { .. } => "duplicate_node_id",
            LoaderError::InvalidChildReference { .. } => "invalid_child_reference",
            LoaderError::MisplacedRoot { .. } => "misplaced_root",
            LoaderError::Config { .. } => "config",
            LoaderError::InTree { source, .. } => source.category(),
        }
    }

    /// Whether retrying the load with different caller parameters can succeed
    /// without touching the model file.
    pub fn is_caller_correctable(&self) -> bool {
        matches!(
            self.root_cause(),
            LoaderError::InvalidClassCount { .. }
                | LoaderError::InvalidDepth { .. }
                | LoaderError::TreeClassMismatch { .. }
                | LoaderError::DepthCapacityExceeded { .. }
                | LoaderError::Config { .. }
        )
    }
}
