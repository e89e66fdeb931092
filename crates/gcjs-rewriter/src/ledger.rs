//! Ancestor Materializer
//!
//! A verbatim namespace like `a.b.c` only works if `a` and `a.b` exist when
//! the statement runs. The materializer emits the missing scaffolding:
//!
//! ```javascript
//! var a=goog.global.a=goog.global.a||{};a.b=a.b||{};
//! ```
//!
//! The `Ledger` records every chain already guaranteed to exist at the
//! current output position, so each prefix is created at most once per file.

use gcjs_common::namespace;
use indexmap::{IndexMap, IndexSet};

/// Namespaces known to exist, in creation order.
///
/// Starts with the namespace root and only ever grows.
#[derive(Debug, Clone)]
pub struct Ledger {
    created: IndexSet<String>,
}

impl Ledger {
    pub fn new(root: &str) -> Self {
        let mut created = IndexSet::new();
        created.insert(root.to_string());
        Ledger { created }
    }

    pub fn contains(&self, ns: &str) -> bool {
        self.created.contains(ns)
    }

    /// Record `ns` as existing. Returns false if it already was.
    pub fn record(&mut self, ns: &str) -> bool {
        if self.created.contains(ns) {
            return false;
        }
        self.created.insert(ns.to_string())
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.created.iter().map(String::as_str)
    }

    /// Closest recorded ancestor of `ns`.
    ///
    /// Ancestors are always recorded before descendants, so scanning from
    /// the newest entry backwards finds the nearest one.
    pub fn nearest_ancestor(&self, ns: &str) -> Option<&str> {
        self.created
            .iter()
            .rev()
            .find(|created| namespace::is_ancestor(created, ns))
            .map(String::as_str)
    }
}

/// Emits create-if-absent statements against a ledger.
#[derive(Debug, Clone, Copy)]
pub struct Materializer<'a> {
    root: &'a str,
    assumed: &'a IndexMap<String, Vec<String>>,
}

impl<'a> Materializer<'a> {
    pub fn new(root: &'a str, assumed: &'a IndexMap<String, Vec<String>>) -> Self {
        Materializer { root, assumed }
    }

    /// Statements that make every missing prefix of `ns` exist.
    ///
    /// With `drop_last`, the final segment is left for the caller to assign.
    /// Namespaces listed in the assumed-ancestor table are materialized
    /// first, in full.
    pub fn ensure(&self, ns: &str, ledger: &mut Ledger, drop_last: bool) -> String {
        let mut out = String::new();
        if ledger.contains(ns) {
            return out;
        }
        if let Some(extra) = self.assumed.get(ns) {
            for assumed in extra {
                self.ensure_chain(assumed, ledger, false, &mut out);
            }
        }
        self.ensure_chain(ns, ledger, drop_last, &mut out);
        out
    }

    fn ensure_chain(&self, ns: &str, ledger: &mut Ledger, drop_last: bool, out: &mut String) {
        if ledger.contains(ns) {
            return;
        }
        let parent = ledger.nearest_ancestor(ns).map(str::to_string);
        let remainder = match &parent {
            Some(parent) => &ns[parent.len() + 1..],
            None => ns,
        };
        let mut needed: Vec<&str> = remainder.split('.').collect();
        if drop_last {
            needed.pop();
        }

        let mut current = parent;
        for segment in needed {
            let path = match current {
                Some(parent) => {
                    let path = format!("{parent}.{segment}");
                    out.push_str(&format!("{path}={path}||{{}};"));
                    path
                }
                None => {
                    let root = self.root;
                    out.push_str(&format!(
                        "var {segment}={root}.global.{segment}={root}.global.{segment}||{{}};"
                    ));
                    segment.to_string()
                }
            };
            tracing::trace!(namespace = %path, "materialized");
            ledger.record(&path);
            current = Some(path);
        }
    }
}

#[cfg(test)]
#[path = "../tests/ledger_tests.rs"]
mod tests;
