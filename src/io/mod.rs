//! Input decoding: raw tree dumps and feature-name resolution.

pub mod feature_map;
pub mod raw;

pub use feature_map::{DefaultFeatureNames, FeatureMap};
pub use raw::{decode_trees, read_model, RawNode};
