//! Declaration Scanner
//!
//! Finds namespace declarations in one file's text:
//!
//! ```javascript
//! goog.provide('app.ui.Button');
//! goog.require("app.events");
//! ```
//!
//! Matching is pattern-based over a closed grammar: the namespace root, a
//! `.provide` / `.require` call, one single- or double-quoted literal and an
//! optional `;`. Whitespace is allowed around the parentheses. Nothing else
//! in the file is parsed.
//!
//! A require behind a `//` line comment is rejected outright, since it
//! almost always marks stale code whose dependency would silently vanish.

use crate::error::{CommentedRequire, RewriteError};
use gcjs_common::Span;
use gcjs_common::namespace::is_identifier_byte;
use dashmap::DashMap;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Provide,
    Require,
}

/// One logical declaration: a namespace plus every place it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub namespace: String,
    /// Spans of every matched statement, in source order.
    pub spans: Vec<Span>,
}

impl Declaration {
    /// Text of the first matched statement.
    pub fn first_match<'s>(&self, source: &'s str) -> &'s str {
        self.spans.first().map_or("", |span| &source[span.as_range()])
    }
}

/// Provides and requires of one file, each in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedDeclarations {
    pub provides: Vec<Declaration>,
    pub requires: Vec<Declaration>,
}

impl ScannedDeclarations {
    pub fn is_empty(&self) -> bool {
        self.provides.is_empty() && self.requires.is_empty()
    }
}

/// Compiled patterns for one namespace root.
#[derive(Debug, Clone)]
pub struct DeclarationScanner {
    root: String,
    declaration: Regex,
    commented_require: Regex,
}

const LITERAL: &str = r#"(?:'(?P<single>[^'\r\n]+)'|"(?P<double>[^"\r\n]+)")"#;

/// Compiled scanners keyed by namespace root.
static SCANNERS: Lazy<DashMap<String, Arc<DeclarationScanner>>> = Lazy::new(DashMap::default);

impl DeclarationScanner {
    pub fn new(root: &str) -> Self {
        let escaped = regex::escape(root);
        let declaration = format!(r"{escaped}\.(?P<kind>provide|require)\s*\(\s*{LITERAL}\s*\);?");
        let commented_require = format!(r"//[ \t]*{escaped}\.require\s*\(\s*{LITERAL}\s*\);?");
        DeclarationScanner {
            root: root.to_string(),
            declaration: Regex::new(&declaration).expect("valid regex"),
            commented_require: Regex::new(&commented_require).expect("valid regex"),
        }
    }

    /// The shared scanner for `root`, compiled on first use.
    pub fn for_root(root: &str) -> Arc<DeclarationScanner> {
        if let Some(scanner) = SCANNERS.get(root) {
            return Arc::clone(scanner.value());
        }
        Arc::clone(
            SCANNERS
                .entry(root.to_string())
                .or_insert_with(|| Arc::new(DeclarationScanner::new(root)))
                .value(),
        )
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Scan every provide and require in `source`.
    ///
    /// Fails if any require is commented out with `//`.
    pub fn scan(&self, source: &str) -> Result<ScannedDeclarations, RewriteError> {
        self.check_commented_requires(source)?;

        let mut provides = DeclarationCollector::new(DeclarationKind::Provide);
        let mut requires = DeclarationCollector::new(DeclarationKind::Require);
        for (kind, namespace, span) in self.matches(source) {
            match kind {
                DeclarationKind::Provide => provides.push(namespace, span),
                DeclarationKind::Require => requires.push(namespace, span),
            }
        }

        Ok(ScannedDeclarations {
            provides: provides.finish(),
            requires: requires.finish(),
        })
    }

    /// Namespaces provided by `source`, in first-occurrence order.
    ///
    /// Used when indexing a project; commented-out requires are not an
    /// error here because the file is not being rewritten.
    pub fn scan_provides(&self, source: &str) -> Vec<String> {
        let mut provides = DeclarationCollector::new(DeclarationKind::Provide);
        for (kind, namespace, span) in self.matches(source) {
            if kind == DeclarationKind::Provide {
                provides.push(namespace, span);
            }
        }
        provides.finish().into_iter().map(|d| d.namespace).collect()
    }

    fn check_commented_requires(&self, source: &str) -> Result<(), RewriteError> {
        let mut line = 1u32;
        let mut counted_to = 0usize;
        let mut matches = Vec::new();
        for found in self.commented_require.find_iter(source) {
            line += memchr::memchr_iter(b'\n', &source.as_bytes()[counted_to..found.start()]).count() as u32;
            counted_to = found.start();
            matches.push(CommentedRequire {
                line,
                text: found.as_str().to_string(),
            });
        }

        if matches.is_empty() {
            Ok(())
        } else {
            Err(RewriteError::CommentedRequire {
                root: self.root.clone(),
                matches,
            })
        }
    }

    fn matches<'s>(&'s self, source: &'s str) -> impl Iterator<Item = (DeclarationKind, &'s str, Span)> + 's {
        let bytes = source.as_bytes();
        self.declaration.captures_iter(source).filter_map(move |caps| {
            let whole = caps.get(0)?;
            // `mygoog.provide(...)` and `x.goog.provide(...)` are not declarations.
            if let Some(&before) = whole.start().checked_sub(1).and_then(|idx| bytes.get(idx))
                && (is_identifier_byte(before) || before == b'.')
            {
                return None;
            }
            let kind = match caps.name("kind")?.as_str() {
                "provide" => DeclarationKind::Provide,
                _ => DeclarationKind::Require,
            };
            Some((kind, literal(&caps)?, Span::from_range(whole.range())))
        })
    }
}

fn literal<'s>(caps: &Captures<'s>) -> Option<&'s str> {
    caps.name("single")
        .or_else(|| caps.name("double"))
        .map(|m| m.as_str())
}

/// Groups matches by namespace, keeping first-occurrence order.
struct DeclarationCollector {
    kind: DeclarationKind,
    by_namespace: IndexMap<String, Vec<Span>>,
}

impl DeclarationCollector {
    fn new(kind: DeclarationKind) -> Self {
        DeclarationCollector {
            kind,
            by_namespace: IndexMap::new(),
        }
    }

    fn push(&mut self, namespace: &str, span: Span) {
        self.by_namespace
            .entry(namespace.to_string())
            .or_default()
            .push(span);
    }

    fn finish(self) -> Vec<Declaration> {
        let kind = self.kind;
        self.by_namespace
            .into_iter()
            .map(|(namespace, spans)| Declaration {
                kind,
                namespace,
                spans,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod tests;
