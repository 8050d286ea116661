//! Core infrastructure module for the XGBoost ensemble loader.
//!
//! - [`types`]: shared type aliases and the placement strategy enum
//! - [`constants`]: limits, defaults and environment variable names
//! - [`error`]: the loader error taxonomy
//! - [`traits`]: the feature resolution capability

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{LoaderError, Result};
pub use traits::*;
pub use types::*;
