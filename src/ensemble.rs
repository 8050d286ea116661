//! Ensemble assembly from XGBoost JSON dumps.
//!
//! [`XgbJsonLoader`] runs the whole load: decode the dump, read the optional
//! feature map, validate the class count and depth hint, flatten every tree
//! and pair the resulting [`Ensemble`] with an [`OutputTransform`]. The load
//! is all-or-nothing: any failure discards everything built so far.

use crate::config::{validate_max_depth, validate_num_classes, LoaderConfig};
use crate::core::constants::XGBOOST_ENSEMBLE_NAME;
use crate::core::error::{LoaderError, Result};
use crate::core::traits::FeatureResolver;
use crate::core::types::Placement;
use crate::io::feature_map::{DefaultFeatureNames, FeatureMap};
use crate::io::raw::{read_model, RawNode};
use crate::tree::builder::build_tree;
use crate::tree::tree::Tree;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output transformation kinds. Only the identity is produced by this loader;
/// applying transformations is the evaluator's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Raw scores are returned unchanged
    Raw,
}

/// Output transformation descriptor attached to a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTransform {
    /// Transformation to apply to raw scores
    pub kind: TransformKind,
    /// Number of raw score groups the evaluator produces per row
    pub num_output_groups: usize,
}

impl OutputTransform {
    /// Identity transformation over `num_output_groups` groups
    pub fn raw(num_output_groups: usize) -> Self {
        OutputTransform {
            kind: TransformKind::Raw,
            num_output_groups,
        }
    }
}

/// Flattened trees of one model with their class count and feature-space size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ensemble {
    name: String,
    trees: Vec<Tree>,
    num_classes: usize,
    num_features: usize,
}

impl Ensemble {
    /// Flatten `raw_trees` in order, stopping at the first failing tree.
    ///
    /// The tree count must be a multiple of `num_classes`. The feature-space
    /// size is the largest per-tree distinct feature count.
    pub fn from_raw_trees(
        raw_trees: &[RawNode],
        num_classes: usize,
        placement: Placement,
        resolver: &dyn FeatureResolver,
    ) -> Result<Self> {
        if num_classes == 0 {
            return Err(LoaderError::InvalidClassCount { num_classes: 0 });
        }
        if raw_trees.len() % num_classes != 0 {
            return Err(LoaderError::TreeClassMismatch {
                trees: raw_trees.len(),
                classes: num_classes,
            });
        }

        let mut trees = Vec::with_capacity(raw_trees.len());
        let mut num_features = 0;
        for (index, raw) in raw_trees.iter().enumerate() {
            let tree = build_tree(raw, placement, resolver).map_err(|e| e.in_tree(index))?;
            log::debug!(
                "Tree {}: {} nodes, {} distinct features",
                index,
                tree.num_nodes(),
                tree.num_features()
            );
            num_features = num_features.max(tree.num_features());
            trees.push(tree);
        }

        Ok(Ensemble {
            name: XGBOOST_ENSEMBLE_NAME.to_string(),
            trees,
            num_classes,
            num_features,
        })
    }

    /// Model family name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trees in model-file order
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of trees
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Declared number of output groups
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Largest number of distinct features used by any single tree.
    ///
    /// This is an upper bound per tree, not the union across trees.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Trees per output group
    pub fn trees_per_class(&self) -> usize {
        self.trees.len() / self.num_classes
    }
}

/// A loaded model: the ensemble and its output transformation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedModel {
    /// Flattened trees
    pub ensemble: Ensemble,
    /// Transformation applied after tree evaluation
    pub transform: OutputTransform,
}

/// Loader for XGBoost JSON tree dumps.
#[derive(Debug, Clone)]
pub struct XgbJsonLoader {
    config: LoaderConfig,
}

impl XgbJsonLoader {
    /// Create a loader for the given parameters
    pub fn new(config: LoaderConfig) -> Self {
        XgbJsonLoader { config }
    }

    /// Load parameters
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Run the load.
    pub fn load(&self) -> Result<LoadedModel> {
        let config = &self.config;
        let raw_trees = read_model(&config.model_path)?;

        let feature_map = config.feature_map().map(FeatureMap::load).transpose()?;

        let num_classes = validate_num_classes(config.num_classes)?;
        let depth = validate_max_depth(config.max_depth)?;

        let resolver: &dyn FeatureResolver = match &feature_map {
            Some(map) => map,
            None => &DefaultFeatureNames,
        };
        let placement = Placement::from_depth_hint(depth);
        log::debug!(
            "Building {} trees from {} using {} and {} placement",
            raw_trees.len(),
            config.model_path.display(),
            resolver.describe(),
            placement
        );

        let ensemble = Ensemble::from_raw_trees(&raw_trees, num_classes, placement, resolver)?;

        if !config.load_transformation {
            log::warn!(
                "Output transformation not requested for {}, attaching raw transformation",
                config.model_path.display()
            );
        }
        let transform = OutputTransform::raw(ensemble.num_classes());

        log::info!(
            "Loaded {} model from {}: {} trees, {} classes, {} features",
            ensemble.name(),
            config.model_path.display(),
            ensemble.num_trees(),
            ensemble.num_classes(),
            ensemble.num_features()
        );

        Ok(LoadedModel {
            ensemble,
            transform,
        })
    }
}

/// Load an XGBoost JSON dump.
///
/// An empty `feature_map_path` means splits use default `f<index>` names.
/// A `max_depth` of 0 means the depth is unknown.
pub fn load_xgboost_from_json<P: AsRef<Path>>(
    model_path: P,
    feature_map_path: &str,
    num_classes: i32,
    max_depth: i32,
    load_transformation: bool,
) -> Result<LoadedModel> {
    let mut config = LoaderConfig::new(model_path.as_ref());
    if !feature_map_path.is_empty() {
        config.feature_map_path = Some(feature_map_path.into());
    }
    config.num_classes = num_classes;
    config.max_depth = max_depth;
    config.load_transformation = load_transformation;

    XgbJsonLoader::new(config).load()
}
