//! Namespace Identifier Policy
//!
//! Decides how a namespace is spelled in the rewritten program:
//!
//! - **Verbatim**: the dotted chain stays as property accesses on objects
//!   hanging off the namespace root (`app.ui.Button`).
//! - **Collapsed**: the namespace matches a configured prefix and becomes one
//!   flat identifier (`app_ui_Button`), which minifiers can mangle freely.
//!
//! The decision and the spelling are pure functions of the namespace, the
//! configuration and the namespace map, so every file agrees on them.

use crate::config::LoaderConfig;
use crate::lookup::NamespaceMap;
use gcjs_common::namespace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    Verbatim,
    Collapsed { flat: String },
}

#[derive(Debug, Clone, Copy)]
pub struct IdentifierPolicy<'a> {
    prefixes: &'a [String],
    separator: &'a str,
    component_extensions: &'a [String],
    map: &'a NamespaceMap,
}

impl<'a> IdentifierPolicy<'a> {
    pub fn new(config: &'a LoaderConfig, map: &'a NamespaceMap) -> Self {
        IdentifierPolicy {
            prefixes: &config.collapse_prefixes,
            separator: &config.collapse_separator,
            component_extensions: &config.component_extensions,
            map,
        }
    }

    pub fn is_collapsible(&self, ns: &str) -> bool {
        self.prefixes.iter().any(|prefix| ns.starts_with(prefix.as_str()))
    }

    /// Flat identifier for `ns`.
    ///
    /// Namespaces whose module path ends in a component extension get an
    /// upper-case first letter so JSX tooling treats them as components.
    pub fn flat_spelling(&self, ns: &str) -> String {
        let flat = namespace::flatten(ns, self.separator);
        if self.is_component(ns) {
            capitalize(&flat)
        } else {
            flat
        }
    }

    pub fn classify(&self, ns: &str) -> Representation {
        if self.is_collapsible(ns) {
            Representation::Collapsed {
                flat: self.flat_spelling(ns),
            }
        } else {
            Representation::Verbatim
        }
    }

    fn is_component(&self, ns: &str) -> bool {
        if self.component_extensions.is_empty() {
            return false;
        }
        self.map.get(ns).is_some_and(|path| {
            let path = path.to_string_lossy();
            self.component_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
        })
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../tests/policy_tests.rs"]
mod tests;
