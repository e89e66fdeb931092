//! Export Tree Builder
//!
//! Builds the epilogue appended after the rewritten body. Provided
//! namespaces are folded into one object per root segment, and every leaf is
//! a reference to the live runtime object rather than a copy:
//!
//! ```javascript
//! // goog.provide('a.b'); goog.provide('a.c.d');
//! exports.a={"b":a.b,"c":{"d":a.c.d}};
//! ```
//!
//! Collapsed namespaces are exported one by one under their flat name.

use gcjs_common::namespace;
use indexmap::IndexMap;

/// Deduplicate `namespaces` and drop every entry that has an ancestor in the
/// list, keeping discovery order.
pub fn outermost(namespaces: &[String]) -> Vec<String> {
    let mut unique: Vec<&String> = Vec::with_capacity(namespaces.len());
    for ns in namespaces {
        if !unique.contains(&ns) {
            unique.push(ns);
        }
    }
    unique
        .iter()
        .filter(|ns| {
            !namespace::ancestors(ns).any(|ancestor| unique.iter().any(|other| other.as_str() == ancestor))
        })
        .map(|ns| (*ns).clone())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ExportNode {
    children: IndexMap<String, ExportNode>,
}

impl ExportNode {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Nested export object keyed by dotted segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTree {
    roots: IndexMap<String, ExportNode>,
}

impl ExportTree {
    /// Fold namespaces into a tree. Callers pass the output of [`outermost`].
    pub fn build<S: AsRef<str>>(namespaces: &[S]) -> Self {
        let mut tree = ExportTree::default();
        for ns in namespaces {
            let mut segments = ns.as_ref().split('.');
            let Some(first) = segments.next() else {
                continue;
            };
            let mut node = tree.roots.entry(first.to_string()).or_default();
            for segment in segments {
                node = node.children.entry(segment.to_string()).or_default();
            }
        }
        tree
    }

    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// One `exports.<root>=...;` statement per root.
    pub fn write_statements(&self, out: &mut String) {
        for (root, node) in &self.roots {
            out.push_str(&format!("exports.{root}="));
            write_value(node, root, out);
            out.push(';');
        }
    }
}

fn write_value(node: &ExportNode, path: &str, out: &mut String) {
    if node.is_leaf() {
        // Leaves reference the runtime object at this path.
        out.push_str(path);
        return;
    }
    out.push('{');
    for (idx, (key, child)) in node.children.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&quote_key(key));
        out.push(':');
        write_value(child, &format!("{path}.{key}"), out);
    }
    out.push('}');
}

fn quote_key(key: &str) -> String {
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""))
}

/// A collapsed namespace and its flat identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedExport {
    pub namespace: String,
    pub flat: String,
}

/// Compose the full epilogue text.
///
/// `provided` are non-collapsed namespaces in discovery order (duplicates
/// and nested entries allowed); `collapsed` are flattened provides.
pub fn build_epilogue(provided: &[String], collapsed: &[CollapsedExport], es6_mode: bool) -> String {
    let exported = outermost(provided);
    let tree = ExportTree::build(&exported);

    let mut collapsed_unique: Vec<&CollapsedExport> = Vec::with_capacity(collapsed.len());
    for entry in collapsed {
        if !collapsed_unique.iter().any(|seen| seen.namespace == entry.namespace) {
            collapsed_unique.push(entry);
        }
    }

    let mut out = String::from(";\n");
    tree.write_statements(&mut out);
    for entry in &collapsed_unique {
        let flat = &entry.flat;
        out.push_str(&format!("exports.{flat}={flat};"));
    }

    if es6_mode {
        let default = exported
            .first()
            .map(String::as_str)
            .or_else(|| collapsed_unique.first().map(|entry| entry.flat.as_str()));
        if let Some(default) = default {
            out.push_str(&format!("exports.default={default};exports.__esModule=true;"));
        }
    }

    out
}

#[cfg(test)]
#[path = "../tests/export_tree_tests.rs"]
mod tests;
