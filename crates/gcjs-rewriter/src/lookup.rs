//! Namespace lookup boundary.
//!
//! The rewriter never scans the project itself. It reads a `NamespaceMap`
//! produced by a `NamespaceLookup` implementation (see the `gcjs-lookup`
//! crate for the directory-scanning one).

use crate::config::LoaderConfig;
use rustc_hash::FxHashMap;
use std::convert::Infallible;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Namespace -> path of the file that provides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: FxHashMap<String, PathBuf>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        NamespaceMap {
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace an entry, returning the previous path.
    pub fn insert(&mut self, namespace: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.entries.insert(namespace.into(), path.into())
    }

    pub fn get(&self, namespace: &str) -> Option<&Path> {
        self.entries.get(namespace).map(PathBuf::as_path)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(ns, path)| (ns.as_str(), path.as_path()))
    }
}

impl<N: Into<String>, P: Into<PathBuf>> FromIterator<(N, P)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        NamespaceMap {
            entries: iter
                .into_iter()
                .map(|(ns, path)| (ns.into(), path.into()))
                .collect(),
        }
    }
}

/// Source of the project-wide namespace map.
///
/// Implementations are expected to memoize: many files are rewritten against
/// the same configuration and should share one resolution.
pub trait NamespaceLookup: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn namespace_map(
        &self,
        config: &LoaderConfig,
    ) -> impl Future<Output = Result<Arc<NamespaceMap>, Self::Error>> + Send;
}

/// A lookup over a map that is already built.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup(pub Arc<NamespaceMap>);

impl StaticLookup {
    pub fn new(map: NamespaceMap) -> Self {
        StaticLookup(Arc::new(map))
    }
}

impl NamespaceLookup for StaticLookup {
    type Error = Infallible;

    async fn namespace_map(&self, _config: &LoaderConfig) -> Result<Arc<NamespaceMap>, Infallible> {
        Ok(Arc::clone(&self.0))
    }
}

/// The JSON-quoted request string written into `require(...)`.
///
/// Absolute paths are made relative to `context` (the directory of the file
/// being rewritten) and always start with `./` or `../`, using forward
/// slashes. Without a context, or for relative paths, the path is used as is.
pub fn module_request(path: &Path, context: Option<&Path>) -> String {
    let request = match context {
        Some(context) if path.is_absolute() && context.is_absolute() => {
            let relative = relative_path(path, context);
            let text = slash_path(&relative);
            if text.starts_with("../") {
                text
            } else {
                format!("./{text}")
            }
        }
        _ => slash_path(path),
    };
    // A plain string always serializes.
    serde_json::to_string(&request).unwrap_or_else(|_| format!("\"{request}\""))
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

#[cfg(test)]
#[path = "../tests/lookup_tests.rs"]
mod tests;
