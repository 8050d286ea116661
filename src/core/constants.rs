//! Loader constants and defaults.

/// Name reported by ensembles built from XGBoost JSON dumps.
pub const XGBOOST_ENSEMBLE_NAME: &str = "xgboost";

/// Largest depth hint accepted for pre-sized placement.
/// A depth of 30 already asks for two billion slots per tree.
pub const MAX_DEPTH_HINT: u32 = 30;

/// Default declared class count (single output group).
pub const DEFAULT_NUM_CLASSES: i32 = 1;

/// Default depth hint, 0 meaning unknown depth.
pub const DEFAULT_MAX_DEPTH: i32 = 0;

/// Environment variable overriding the class count.
pub const ENV_NUM_CLASSES: &str = "XGB_LOADER_NUM_CLASSES";

/// Environment variable overriding the depth hint.
pub const ENV_MAX_DEPTH: &str = "XGB_LOADER_MAX_DEPTH";

/// Environment variable naming a feature-map file.
pub const ENV_FEATURE_MAP: &str = "XGB_LOADER_FEATURE_MAP";

/// Environment variable toggling the output transformation.
pub const ENV_LOAD_TRANSFORMATION: &str = "XGB_LOADER_LOAD_TRANSFORMATION";

/// Version information.
pub const XGB_ENSEMBLE_LOADER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of slots a depth-hinted tree array holds.
pub const fn capacity_for_depth(depth: u32) -> usize {
    (1usize << (depth + 1)) - 1
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_for_depth() {
        assert_eq!(capacity_for_depth(0), 1);
        assert_eq!(capacity_for_depth(1), 3);
        assert_eq!(capacity_for_depth(4), 31);
        assert_eq!(capacity_for_depth(MAX_DEPTH_HINT), (1usize << 31) - 1);
    }

    #[test]
    fn test_version_constant() {
        assert!(!XGB_ENSEMBLE_LOADER_VERSION.is_empty());
    }
}
