//! Feature name resolution.
//!
//! Two resolvers implement [`FeatureResolver`]:
//!
//! - [`FeatureMap`], read from an XGBoost feature-map file with one
//!   `<index> <name> <type>` record per line. The type column is accepted
//!   but not interpreted.
//! - [`DefaultFeatureNames`], used when no map is given, which parses
//!   XGBoost's default `f0, f1, ...` names.

use crate::core::error::{LoaderError, Result};
use crate::core::traits::FeatureResolver;
use crate::core::types::FeatureIndex;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Feature name to feature index mapping with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    indices: HashMap<String, FeatureIndex>,
}

impl FeatureMap {
    /// Read a feature-map file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoaderError::io(path, e))?;
        let map = Self::from_reader(BufReader::new(file), path)?;

        if map.is_empty() {
            log::warn!("Feature map {} has no entries", path.display());
        } else {
            log::debug!(
                "Loaded {} feature names from {}",
                map.len(),
                path.display()
            );
        }
        Ok(map)
    }

    /// Parse feature-map records from a reader. `path` labels errors.
    ///
    /// Any repeated name is an error, wherever the repeat occurs.
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut indices = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line_no = line_no + 1;
            let line = line.map_err(|e| LoaderError::io(path, e))?;

            let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
            if tokens.len() != 3 {
                return Err(LoaderError::malformed_mapping(
                    path,
                    line_no,
                    format!("expected 3 fields 'index name type', found {}", tokens.len()),
                ));
            }

            let index: FeatureIndex = tokens[0].parse().map_err(|_| {
                LoaderError::malformed_mapping(
                    path,
                    line_no,
                    format!("feature index '{}' is not a non-negative integer", tokens[0]),
                )
            })?;

            match indices.entry(tokens[1].to_string()) {
                Entry::Occupied(entry) => {
                    return Err(LoaderError::DuplicateFeatureName {
                        path: path.to_path_buf(),
                        line: line_no,
                        name: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
            }
        }

        Ok(FeatureMap { indices })
    }

    /// Index mapped to `name`
    pub fn get(&self, name: &str) -> Option<FeatureIndex> {
        self.indices.get(name).copied()
    }

    /// Number of mapped names
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the map has no names
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(name, index)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureIndex)> + '_ {
        self.indices.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    /// Largest mapped index
    pub fn max_index(&self) -> Option<FeatureIndex> {
        self.indices.values().copied().max()
    }
}

impl FromIterator<(String, FeatureIndex)> for FeatureMap {
    /// Later pairs replace earlier ones; use [`FeatureMap::from_reader`] for
    /// duplicate checking.
    fn from_iter<I: IntoIterator<Item = (String, FeatureIndex)>>(iter: I) -> Self {
        FeatureMap {
            indices: iter.into_iter().collect(),
        }
    }
}

impl FeatureResolver for FeatureMap {
    fn resolve(&self, name: &str) -> Result<FeatureIndex> {
        self.get(name).ok_or_else(|| LoaderError::UnknownFeature {
            name: name.to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("feature map ({} names)", self.len())
    }
}

/// Resolver for XGBoost's default feature names: one marker character
/// followed by the decimal feature index (`f0`, `f17`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFeatureNames;

impl FeatureResolver for DefaultFeatureNames {
    fn resolve(&self, name: &str) -> Result<FeatureIndex> {
        let invalid = || LoaderError::InvalidFeatureName {
            name: name.to_string(),
        };

        let mut chars = name.chars();
        chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();

        // str::parse would also take a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse().map_err(|_| invalid())
    }

    fn describe(&self) -> String {
        "default feature names".to_string()
    }
}
