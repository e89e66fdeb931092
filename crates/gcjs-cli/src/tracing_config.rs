//! Tracing configuration for the gcjs binary.
//!
//! Supports three output formats controlled by `GCJS_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, one block per
//!   rewritten file
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Which declarations were found and how many edits each file got
//! GCJS_LOG=debug GCJS_LOG_FORMAT=tree gcjs src/app.js
//!
//! # Every individual edit and materialized namespace
//! GCJS_LOG="gcjs_rewriter=trace" gcjs src/app.js
//! ```
//!
//! The subscriber is only initialised when `GCJS_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal runs.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event; what you get when `GCJS_LOG_FORMAT` is unset.
    Text,
    /// Events nested under each file's `rewrite` span.
    Tree,
    /// Newline-delimited JSON, for piping into `jq`.
    Json,
}

impl LogFormat {
    /// Unknown values fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("GCJS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `GCJS_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("GCJS_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// All output goes to stderr so it never mixes with rewritten code printed
/// to stdout.
pub fn init_tracing() {
    let has_gcjs_log = std::env::var("GCJS_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_gcjs_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
