//! Project scanning: build a namespace map from the files under the roots.
//!
//! Files are discovered with `walkdir`, filtered by extension through a
//! `globset` matcher, sorted, then read and scanned in parallel with rayon.
//! When two files provide the same namespace, the first in sorted path order
//! wins and the conflict is logged.

use crate::error::LookupError;
use gcjs_rewriter::{DeclarationScanner, LoaderConfig, NamespaceMap};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Scan every root in `config.paths` and index the provided namespaces.
pub fn build_namespace_map(config: &LoaderConfig) -> Result<NamespaceMap, LookupError> {
    let matcher = extension_matcher(&config.extensions)?;
    let roots = absolute_roots(&config.paths)?;
    let files = discover_files(&roots, &matcher)?;
    let scanner = DeclarationScanner::for_root(&config.namespace_root);

    let provided = files
        .par_iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|source| LookupError::Io {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8_lossy(&bytes);
            Ok((path, scanner.scan_provides(&text)))
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    let mut map = NamespaceMap::new();
    for (path, namespaces) in provided {
        for ns in namespaces {
            if let Some(existing) = map.get(&ns) {
                warn!(
                    namespace = %ns,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "namespace provided by more than one file"
                );
                continue;
            }
            map.insert(ns, path.clone());
        }
    }

    debug!(
        roots = roots.len(),
        files = files.len(),
        namespaces = map.len(),
        "indexed namespaces"
    );
    Ok(map)
}

/// Resolve configured roots against the working directory.
pub(crate) fn absolute_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>, LookupError> {
    paths
        .iter()
        .map(|root| {
            std::path::absolute(root).map_err(|source| LookupError::Io {
                path: root.clone(),
                source,
            })
        })
        .collect()
}

/// Matches file names ending in one of `extensions` (given without the dot).
fn extension_matcher(extensions: &[String]) -> Result<GlobSet, LookupError> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        builder.add(GlobBuilder::new(&format!("*.{ext}")).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

/// All matching files under `roots`, sorted by path.
fn discover_files(roots: &[PathBuf], matcher: &GlobSet) -> Result<Vec<PathBuf>, LookupError> {
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|source| LookupError::Walk {
                root: root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && matches_name(matcher, entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn matches_name(matcher: &GlobSet, path: &Path) -> bool {
    path.file_name().is_some_and(|name| matcher.is_match(name))
}

#[cfg(test)]
#[path = "../tests/scan_tests.rs"]
mod tests;
