//! Load parameters for the XGBoost JSON loader.
//!
//! [`LoaderConfig`] carries the five entry-point arguments: model path,
//! optional feature-map path, declared class count, depth hint and the
//! transformation flag. It can be built in code, read from a `.json` or
//! `.toml` file, and overridden from the environment.

use crate::core::constants::*;
use crate::core::error::{LoaderError, Result};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of a single model load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// JSON tree dump to load
    pub model_path: PathBuf,
    /// Optional `index name type` feature map; `None` means `f<digits>` naming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_map_path: Option<PathBuf>,
    /// Number of output groups; the tree count must be a multiple of it
    pub num_classes: i32,
    /// Upper bound on tree depth, 0 for unknown
    pub max_depth: i32,
    /// Attach an output transformation to the loaded model
    pub load_transformation: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            model_path: PathBuf::new(),
            feature_map_path: None,
            num_classes: DEFAULT_NUM_CLASSES,
            max_depth: DEFAULT_MAX_DEPTH,
            load_transformation: true,
        }
    }
}

impl LoaderConfig {
    /// Create a configuration for `model_path` with default values otherwise
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        LoaderConfig {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Validate the numeric parameters.
    pub fn validate(&self) -> Result<()> {
        validate_num_classes(self.num_classes)?;
        validate_max_depth(self.max_depth)?;
        Ok(())
    }

    /// Feature-map path with the empty path treated as absent.
    pub fn feature_map(&self) -> Option<&Path> {
        self.feature_map_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::config(format!("Failed to read config file: {}", e)))?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| LoaderError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| LoaderError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(LoaderError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| LoaderError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| LoaderError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(LoaderError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| LoaderError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `XGB_LOADER_*` environment variable overrides
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_NUM_CLASSES) {
            self.num_classes = val
                .trim()
                .parse()
                .map_err(|_| LoaderError::config(format!("Invalid {}", ENV_NUM_CLASSES)))?;
        }

        if let Some(val) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = val
                .trim()
                .parse()
                .map_err(|_| LoaderError::config(format!("Invalid {}", ENV_MAX_DEPTH)))?;
        }

        if let Some(val) = lookup(ENV_FEATURE_MAP) {
            self.feature_map_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Some(val) = lookup(ENV_LOAD_TRANSFORMATION) {
            self.load_transformation = match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(LoaderError::config(format!(
                        "Invalid {}",
                        ENV_LOAD_TRANSFORMATION
                    )))
                }
            };
        }

        self.validate()
    }
}

/// Check a declared class count.
pub fn validate_num_classes(num_classes: i32) -> Result<usize> {
    if num_classes <= 0 {
        return Err(LoaderError::InvalidClassCount {
            num_classes: num_classes as i64,
        });
    }
    Ok(num_classes as usize)
}

/// Check a depth hint and narrow it to the unsigned form the builder uses.
pub fn validate_max_depth(max_depth: i32) -> Result<u32> {
    if max_depth < 0 {
        return Err(LoaderError::invalid_depth(
            max_depth as i64,
            "max depth cannot be smaller than 0",
        ));
    }
    let depth = max_depth as u32;
    if depth > MAX_DEPTH_HINT {
        return Err(LoaderError::invalid_depth(
            max_depth as i64,
            format!(
                "max depth cannot exceed {}, use 0 for unknown depth",
                MAX_DEPTH_HINT
            ),
        ));
    }
    Ok(depth)
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
    validation_errors: Vec<String>,
}

impl LoaderConfigBuilder {
    /// Create a new configuration builder
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        LoaderConfigBuilder {
            config: LoaderConfig::new(model_path),
            validation_errors: Vec::new(),
        }
    }

    /// Set the feature-map file; an empty path means none
    pub fn feature_map<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.config.feature_map_path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    /// Set the declared class count
    pub fn num_classes(mut self, num_classes: i32) -> Self {
        if num_classes <= 0 {
            self.validation_errors
                .push("num_classes must be greater than 0".to_string());
        }
        self.config.num_classes = num_classes;
        self
    }

    /// Set the depth hint
    pub fn max_depth(mut self, depth: i32) -> Self {
        if depth < 0 {
            self.validation_errors
                .push("max_depth cannot be smaller than 0".to_string());
        }
        self.config.max_depth = depth;
        self
    }

    /// Set whether to attach an output transformation
    pub fn load_transformation(mut self, load: bool) -> Self {
        self.config.load_transformation = load;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<LoaderConfig> {
        if !self.validation_errors.is_empty() {
            return Err(LoaderError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = LoaderConfig::default();
        assert_eq!(config.num_classes, DEFAULT_NUM_CLASSES);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.feature_map_path.is_none());
        assert!(config.load_transformation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = LoaderConfig::new("model.json");

        config.num_classes = 0;
        assert!(matches!(
            config.validate(),
            Err(LoaderError::InvalidClassCount { num_classes: 0 })
        ));

        config.num_classes = 2;
        config.max_depth = -1;
        assert!(matches!(
            config.validate(),
            Err(LoaderError::InvalidDepth { depth: -1, .. })
        ));

        config.max_depth = MAX_DEPTH_HINT as i32 + 1;
        assert!(matches!(
            config.validate(),
            Err(LoaderError::InvalidDepth { .. })
        ));

        config.max_depth = 6;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_feature_map_is_absent() {
        let mut config = LoaderConfig::new("model.json");
        config.feature_map_path = Some(PathBuf::new());
        assert!(config.feature_map().is_none());

        config.feature_map_path = Some(PathBuf::from("fmap.txt"));
        assert_eq!(config.feature_map(), Some(Path::new("fmap.txt")));
    }

    #[test]
    fn test_config_builder() {
        let config = LoaderConfigBuilder::new("model.json")
            .feature_map("fmap.txt")
            .num_classes(3)
            .max_depth(4)
            .load_transformation(false)
            .build()
            .unwrap();

        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.feature_map(), Some(Path::new("fmap.txt")));
        assert_eq!(config.num_classes, 3);
        assert_eq!(config.max_depth, 4);
        assert!(!config.load_transformation);
    }

    #[test]
    fn test_config_builder_validation() {
        let result = LoaderConfigBuilder::new("model.json")
            .num_classes(0)
            .max_depth(-2)
            .build();

        match result {
            Err(LoaderError::Config { message }) => {
                assert!(message.contains("num_classes"));
                assert!(message.contains("max_depth"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_NUM_CLASSES, "3"),
            (ENV_MAX_DEPTH, " 5 "),
            (ENV_FEATURE_MAP, "features.fmap"),
            (ENV_LOAD_TRANSFORMATION, "false"),
        ]
        .into_iter()
        .collect();

        let mut config = LoaderConfig::new("model.json");
        config
            .apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.num_classes, 3);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.feature_map(), Some(Path::new("features.fmap")));
        assert!(!config.load_transformation);
    }

    #[test]
    fn test_invalid_override() {
        let mut config = LoaderConfig::new("model.json");
        let result = config.apply_overrides_from(|k| {
            (k == ENV_MAX_DEPTH).then(|| "deep".to_string())
        });
        assert!(matches!(result, Err(LoaderError::Config { .. })));

        let result = config.apply_overrides_from(|k| {
            (k == ENV_NUM_CLASSES).then(|| "-4".to_string())
        });
        assert!(matches!(
            result,
            Err(LoaderError::InvalidClassCount { num_classes: -4 })
        ));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LoaderConfigBuilder::new("iris.json")
            .num_classes(3)
            .max_depth(4)
            .build()
            .unwrap();

        for name in ["loader.json", "loader.toml"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            let loaded = LoaderConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
        }

        let bad = dir.path().join("loader.yaml");
        assert!(matches!(
            config.save_to_file(&bad),
            Err(LoaderError::Config { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("loader.toml");
        std::fs::write(&path, "model_path = \"m.json\"\nnum_classes = 2\n").unwrap();

        let config = LoaderConfig::load_from_file(&path).unwrap();
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.num_classes, 2);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.load_transformation);
    }
}
