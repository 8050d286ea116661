//! Configuration for model loading.
//!
//! Provides [`LoaderConfig`], its builder, and the standalone validators the
//! ensemble assembler runs on raw entry-point arguments.

pub mod core;

pub use self::core::{validate_max_depth, validate_num_classes, LoaderConfig, LoaderConfigBuilder};
