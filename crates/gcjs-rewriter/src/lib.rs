//! Closure namespace to CommonJS rewriter.
//!
//! Rewrites `goog.provide` / `goog.require` declarations into CommonJS:
//! requires become `require(...)` calls, provided namespaces are created on
//! demand and exported from the module as live references.
//!
//! The pipeline for one file:
//! - `scanner`: find declarations and reject commented-out requires
//! - `policy`: decide verbatim vs. collapsed spelling per namespace
//! - `ledger`: materialize missing ancestor objects exactly once
//! - `engine`: build the edit list and apply it
//! - `export_tree`: compose the `exports.*` epilogue
//! - `splice`: re-base an input source map over the edits
//!
//! The project-wide namespace map comes from a [`NamespaceLookup`].

pub mod config;
pub mod engine;
pub mod error;
pub mod export_tree;
pub mod ledger;
pub mod lookup;
pub mod policy;
pub mod scanner;
pub mod splice;

pub use config::{ConfigError, ConfigFile, DEFAULT_PROFILE, LoaderConfig, PartialConfig};
pub use engine::{RewriteOptions, RewriteOutput, rewrite, rewrite_with_lookup};
pub use error::{CommentedRequire, RewriteError};
pub use lookup::{NamespaceLookup, NamespaceMap, StaticLookup, module_request};
pub use policy::{IdentifierPolicy, Representation};
pub use scanner::{Declaration, DeclarationKind, DeclarationScanner, ScannedDeclarations};
