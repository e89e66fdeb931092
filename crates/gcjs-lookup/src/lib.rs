//! Project-wide namespace lookup for the gcjs rewriter.
//!
//! Scans the configured root directories, indexes every file's own
//! `provide` declarations into a [`NamespaceMap`], and serves that map to
//! concurrent rewrites through the [`NamespaceLookup`] trait.
//!
//! [`NamespaceMap`]: gcjs_rewriter::NamespaceMap
//! [`NamespaceLookup`]: gcjs_rewriter::NamespaceLookup

pub mod error;
pub mod provider;
pub mod scan;

pub use error::LookupError;
pub use provider::{DirectoryLookup, LookupCache};
pub use scan::build_namespace_map;
