//! Core trait definitions for the XGBoost ensemble loader.

use crate::core::error::Result;
use crate::core::types::FeatureIndex;

use std::fmt::Debug;

/// Translates a split's raw feature identifier into a feature column index.
///
/// The loader picks one implementation per load call: a [`FeatureMap`] read
/// from disk, or [`DefaultFeatureNames`] when no map is supplied. The tree
/// builder only sees this trait.
///
/// [`FeatureMap`]: crate::io::feature_map::FeatureMap
/// [`DefaultFeatureNames`]: crate::io::feature_map::DefaultFeatureNames
pub trait FeatureResolver: Send + Sync + Debug {
    /// Resolve `name` to a feature index.
    fn resolve(&self, name: &str) -> Result<FeatureIndex>;

    /// Short label used in log output.
    fn describe(&self) -> String;
}
