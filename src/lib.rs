//! # XGBoost Ensemble Loader
//!
//! Loads the JSON tree dump written by XGBoost's `dump_model` into a compact,
//! index-addressed ensemble ready for a separate inference engine to walk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xgb_ensemble_loader::load_xgboost_from_json;
//!
//! # fn main() -> xgb_ensemble_loader::Result<()> {
//! // 3 classes, trees at most 4 deep, default `f<index>` feature names
//! let model = load_xgboost_from_json("iris_xgboost_dump.json", "", 3, 4, true)?;
//!
//! let ensemble = &model.ensemble;
//! println!(
//!     "{} trees, {} per class, {} features",
//!     ensemble.num_trees(),
//!     ensemble.trees_per_class(),
//!     ensemble.num_features()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### With a feature map and a configuration builder
//!
//! ```rust,no_run
//! use xgb_ensemble_loader::{LoaderConfigBuilder, XgbJsonLoader};
//!
//! # fn main() -> xgb_ensemble_loader::Result<()> {
//! let config = LoaderConfigBuilder::new("model_dump.json")
//!     .feature_map("features.fmap")
//!     .num_classes(1)
//!     .max_depth(0) // unknown depth: nodes are sorted by id after traversal
//!     .build()?;
//!
//! let model = XgbJsonLoader::new(config).load()?;
//! assert_eq!(model.transform.num_output_groups, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error taxonomy, shared types, constants and the feature resolver trait
//! - [`config`]: load parameters, file and environment configuration
//! - [`io`]: raw dump decoding and feature-name resolution
//! - [`tree`]: flattened nodes and trees, and the builder that produces them
//! - [`ensemble`]: the load pipeline and the loaded model object

#![doc(html_root_url = "https://docs.rs/xgb-ensemble-loader/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Raw decoding and feature resolution
pub mod io;

// Flattened trees
pub mod tree;

// Ensemble assembly
pub mod ensemble;

pub use crate::core::{
    constants::*,
    error::{LoaderError, Result},
    traits::FeatureResolver,
    types::*,
};

pub use config::{LoaderConfig, LoaderConfigBuilder};

pub use io::{DefaultFeatureNames, FeatureMap, RawNode};

pub use tree::{build_tree, Node, Tree};

pub use ensemble::{
    load_xgboost_from_json, Ensemble, LoadedModel, OutputTransform, TransformKind, XgbJsonLoader,
};

// Version information
pub use crate::core::constants::XGB_ENSEMBLE_LOADER_VERSION as VERSION;

/// Install an `env_logger` backend for the `log` output of this crate.
///
/// Uses `RUST_LOG` when set and `info` otherwise. Calling this when a logger
/// is already installed does nothing.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
