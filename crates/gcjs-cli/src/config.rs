//! Configuration loading for the CLI.
//!
//! `paths` inside a config file are relative to the file's directory;
//! `--path` values are relative to the working directory.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use gcjs_rewriter::{ConfigFile, LoaderConfig, PartialConfig};
use std::path::Path;

/// Read and parse a config file, rebasing its relative paths.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let mut file = ConfigFile::from_json(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    if let Some(base) = path.parent() {
        rebase_paths(&mut file.defaults, base);
        for layer in file.profiles.values_mut() {
            rebase_paths(layer, base);
        }
    }
    Ok(file)
}

fn rebase_paths(layer: &mut PartialConfig, base: &Path) {
    if let Some(paths) = layer.paths.as_mut() {
        for path in paths.iter_mut() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Merge config file defaults, the selected profile and CLI overrides.
pub fn resolve_config(args: &CliArgs) -> Result<LoaderConfig> {
    let file = match &args.config {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    let config = file.resolve(args.profile.as_deref(), &args.overrides())?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
