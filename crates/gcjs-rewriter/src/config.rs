//! Loader configuration and layered merging.
//!
//! The effective configuration is built from three layers, applied in order:
//! pipeline-wide defaults, a named profile, and per-invocation overrides.
//! Scalars in a later layer replace earlier values; lists are concatenated
//! (keeping the first occurrence of duplicates); maps merge key by key.
//!
//! Config files are JSON with camelCase keys:
//!
//! ```json
//! {
//!   "paths": ["src"],
//!   "profiles": {
//!     "closureLoader": { "collapsePrefixes": ["bb."], "es6mode": true }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Profile used when none is named explicitly.
pub const DEFAULT_PROFILE: &str = "closureLoader";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration profile '{0}'")]
    UnknownProfile(String),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fully-resolved options for one rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Root directories the namespace lookup scans.
    pub paths: Vec<PathBuf>,
    /// Invalidate the cached namespace map when files under `paths` change.
    pub watch: bool,
    /// Emit `exports.default` and the `__esModule` marker.
    #[serde(rename = "es6mode")]
    pub es6_mode: bool,
    /// Namespaces starting with any of these are flattened to one identifier.
    pub collapse_prefixes: Vec<String>,
    /// Replaces `.` in flattened identifiers.
    pub collapse_separator: String,
    /// Global object the declarations hang off (`goog` in `goog.provide`).
    pub namespace_root: String,
    /// Module paths with these suffixes get a capitalized flat identifier.
    pub component_extensions: Vec<String>,
    /// Extra namespaces to materialize before a given namespace.
    pub assumed_ancestors: IndexMap<String, Vec<String>>,
    /// File extensions (without the dot) the lookup indexes.
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            paths: Vec::new(),
            watch: true,
            es6_mode: false,
            collapse_prefixes: Vec::new(),
            collapse_separator: "_".to_string(),
            namespace_root: "goog".to_string(),
            component_extensions: Vec::new(),
            assumed_ancestors: IndexMap::new(),
            extensions: vec!["js".to_string(), "jsx".to_string()],
        }
    }
}

/// One configuration layer; absent fields leave the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
    #[serde(default, rename = "es6mode", skip_serializing_if = "Option::is_none")]
    pub es6_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumed_ancestors: Option<IndexMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

fn extend_unique<T: PartialEq + Clone>(target: &mut Vec<T>, extra: &[T]) {
    for item in extra {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

impl LoaderConfig {
    /// Apply one layer on top of this configuration.
    pub fn apply(&mut self, layer: &PartialConfig) {
        if let Some(paths) = &layer.paths {
            extend_unique(&mut self.paths, paths);
        }
        if let Some(watch) = layer.watch {
            self.watch = watch;
        }
        if let Some(es6_mode) = layer.es6_mode {
            self.es6_mode = es6_mode;
        }
        if let Some(prefixes) = &layer.collapse_prefixes {
            extend_unique(&mut self.collapse_prefixes, prefixes);
        }
        if let Some(separator) = &layer.collapse_separator {
            self.collapse_separator.clone_from(separator);
        }
        if let Some(root) = &layer.namespace_root {
            self.namespace_root.clone_from(root);
        }
        if let Some(extensions) = &layer.component_extensions {
            extend_unique(&mut self.component_extensions, extensions);
        }
        if let Some(assumed) = &layer.assumed_ancestors {
            for (namespace, extra) in assumed {
                extend_unique(self.assumed_ancestors.entry(namespace.clone()).or_default(), extra);
            }
        }
        if let Some(extensions) = &layer.extensions {
            extend_unique(&mut self.extensions, extensions);
        }
    }

    /// Builder-style variant of [`LoaderConfig::apply`].
    pub fn merged(mut self, layer: &PartialConfig) -> Self {
        self.apply(layer);
        self
    }
}

/// On-disk configuration: defaults plus named profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub defaults: PartialConfig,
    #[serde(default)]
    pub profiles: IndexMap<String, PartialConfig>,
}

impl ConfigFile {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve `defaults <- profile <- overrides` on top of built-in defaults.
    ///
    /// Naming a profile that does not exist is an error, except for
    /// [`DEFAULT_PROFILE`], which may be omitted from the file.
    pub fn resolve(
        &self,
        profile: Option<&str>,
        overrides: &PartialConfig,
    ) -> Result<LoaderConfig, ConfigError> {
        let name = profile.unwrap_or(DEFAULT_PROFILE);
        let profile_layer = match self.profiles.get(name) {
            Some(layer) => Some(layer),
            None if name == DEFAULT_PROFILE => None,
            None => return Err(ConfigError::UnknownProfile(name.to_string())),
        };

        let mut config = LoaderConfig::default();
        config.apply(&self.defaults);
        if let Some(layer) = profile_layer {
            config.apply(layer);
        }
        config.apply(overrides);
        Ok(config)
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
