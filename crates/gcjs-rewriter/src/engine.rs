//! Rewrite Engine
//!
//! Turns one namespace-declaring file into a CommonJS module:
//!
//! ```javascript
//! goog.provide('app.Widget');
//! goog.require('app.util');
//! app.Widget = function () { return app.util.id(); };
//! ```
//!
//! Becomes:
//!
//! ```javascript
//! var app=goog.global.app=goog.global.app||{};app.util=require("./util.js").app.util;app.Widget=app.Widget||{};
//! app.Widget = function () { return app.util.id(); };
//! ;
//! exports.app={"Widget":app.Widget};
//! ```
//!
//! The pass runs in a fixed order: scan, provides, requires, collapse
//! substitution, epilogue. Every change is recorded as an edit over the
//! untouched input so the input source map can be re-based exactly.

use crate::config::LoaderConfig;
use crate::error::RewriteError;
use crate::export_tree::{CollapsedExport, build_epilogue};
use crate::ledger::{Ledger, Materializer};
use crate::lookup::{NamespaceLookup, NamespaceMap, module_request};
use crate::policy::{IdentifierPolicy, Representation};
use crate::scanner::{Declaration, DeclarationScanner};
use crate::splice::splice_source_map;
use gcjs_common::namespace::{self, is_identifier_byte};
use gcjs_common::{RawSourceMap, Span, TextEdit, TextEdits};
use memchr::memmem;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Per-invocation options.
#[derive(Debug, Clone, Copy)]
pub struct RewriteOptions<'a> {
    pub config: &'a LoaderConfig,
    /// Directory `require(...)` requests are made relative to.
    pub context: Option<&'a Path>,
    /// `file` of the produced source map.
    pub output_file: Option<&'a str>,
}

impl<'a> RewriteOptions<'a> {
    pub fn new(config: &'a LoaderConfig) -> Self {
        RewriteOptions {
            config,
            context: None,
            output_file: None,
        }
    }

    pub fn with_context(mut self, context: &'a Path) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_output_file(mut self, output_file: &'a str) -> Self {
        self.output_file = Some(output_file);
        self
    }
}

/// Result of rewriting one file.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutput {
    /// Rewritten body followed by the export epilogue.
    pub code: String,
    /// Re-based source map, present only when an input map was given.
    pub map: Option<RawSourceMap>,
    /// Provided namespaces, in source order.
    pub provides: Vec<String>,
    /// Required namespaces, in source order.
    pub requires: Vec<String>,
}

/// Rewrite `source` against an already-resolved namespace map.
pub fn rewrite(
    source: &str,
    input_map: Option<&RawSourceMap>,
    map: &NamespaceMap,
    options: &RewriteOptions<'_>,
) -> Result<RewriteOutput, RewriteError> {
    let _span = tracing::debug_span!("rewrite", file = options.output_file.unwrap_or("<anonymous>")).entered();

    let config = options.config;
    let scanned = DeclarationScanner::for_root(&config.namespace_root).scan(source)?;
    debug!(
        provides = scanned.provides.len(),
        requires = scanned.requires.len(),
        "scanned declarations"
    );

    let mut pass = RewritePass::new(source, map, options);
    pass.rewrite_provides(&scanned.provides, !scanned.requires.is_empty());
    pass.rewrite_requires(&scanned.requires)?;
    pass.collapse_occurrences();

    let epilogue = build_epilogue(&pass.exported, &pass.collapsed_exports, config.es6_mode);
    let mut code = pass.edits.apply(source);
    code.push_str(&epilogue);

    let map = input_map
        .map(|input| splice_source_map(input, source, &code, &pass.edits, options.output_file))
        .transpose()?;

    Ok(RewriteOutput {
        code,
        map,
        provides: scanned.provides.into_iter().map(|d| d.namespace).collect(),
        requires: scanned.requires.into_iter().map(|d| d.namespace).collect(),
    })
}

/// Await the namespace map from `lookup`, then [`rewrite`].
///
/// A lookup failure is returned unchanged as [`RewriteError::Lookup`].
pub async fn rewrite_with_lookup<L: NamespaceLookup>(
    lookup: &L,
    source: &str,
    input_map: Option<&RawSourceMap>,
    options: &RewriteOptions<'_>,
) -> Result<RewriteOutput, RewriteError> {
    let map = lookup
        .namespace_map(options.config)
        .await
        .map_err(|err| RewriteError::Lookup(Box::new(err)))?;
    rewrite(source, input_map, &map, options)
}

/// State threaded through one file's rewrite.
struct RewritePass<'a> {
    source: &'a str,
    map: &'a NamespaceMap,
    context: Option<&'a Path>,
    policy: IdentifierPolicy<'a>,
    materializer: Materializer<'a>,
    ledger: Ledger,
    edits: TextEdits,
    /// Collapsible namespaces from requires, then provides.
    required_collapsed: Vec<(String, String)>,
    provided_collapsed: Vec<(String, String)>,
    /// Non-collapsed provides, in discovery order.
    exported: Vec<String>,
    collapsed_exports: Vec<CollapsedExport>,
}

impl<'a> RewritePass<'a> {
    fn new(source: &'a str, map: &'a NamespaceMap, options: &RewriteOptions<'a>) -> Self {
        let config = options.config;
        RewritePass {
            source,
            map,
            context: options.context,
            policy: IdentifierPolicy::new(config, map),
            materializer: Materializer::new(&config.namespace_root, &config.assumed_ancestors),
            ledger: Ledger::new(&config.namespace_root),
            edits: TextEdits::new(),
            required_collapsed: Vec::new(),
            provided_collapsed: Vec::new(),
            exported: Vec::new(),
            collapsed_exports: Vec::new(),
        }
    }

    /// Replace every matched instance of a declaration.
    fn replace_declaration(&mut self, declaration: &Declaration, replacement: &str) {
        for &span in &declaration.spans {
            trace!(%span, namespace = %declaration.namespace, replacement, "declaration edit");
            // Declaration spans come from one non-overlapping regex pass.
            let inserted = self.edits.try_insert(TextEdit::new(span, replacement));
            debug_assert!(inserted, "declaration spans overlap at {span}");
        }
    }

    fn rewrite_provides(&mut self, provides: &[Declaration], has_requires: bool) {
        for provide in provides {
            let ns = provide.namespace.as_str();
            warn_if_invalid(ns);
            let replacement = match self.policy.classify(ns) {
                Representation::Collapsed { flat } => {
                    let replacement = format!("var {flat}={{}};");
                    self.provided_collapsed.push((ns.to_string(), flat.clone()));
                    self.collapsed_exports.push(CollapsedExport {
                        namespace: ns.to_string(),
                        flat,
                    });
                    replacement
                }
                Representation::Verbatim => {
                    self.exported.push(ns.to_string());
                    // With requires present, the last require materializes
                    // provides instead.
                    if has_requires {
                        String::new()
                    } else {
                        self.materializer.ensure(ns, &mut self.ledger, false)
                    }
                }
            };
            self.replace_declaration(provide, &replacement);
        }
    }

    fn rewrite_requires(&mut self, requires: &[Declaration]) -> Result<(), RewriteError> {
        let last = requires.len().checked_sub(1);
        for (idx, require) in requires.iter().enumerate() {
            let ns = require.namespace.as_str();
            warn_if_invalid(ns);
            let path = self
                .map
                .get(ns)
                .ok_or_else(|| RewriteError::UnresolvedDependency {
                    namespace: ns.to_string(),
                })?;
            let request = module_request(path, self.context);

            let mut replacement = match self.policy.classify(ns) {
                Representation::Collapsed { flat } => {
                    let replacement = format!("var {flat}=require({request}).{flat};");
                    self.required_collapsed.push((ns.to_string(), flat));
                    replacement
                }
                Representation::Verbatim => {
                    let mut replacement = self.materializer.ensure(ns, &mut self.ledger, true);
                    self.ledger.record(ns);
                    replacement.push_str(&format!("{ns}=require({request}).{ns};"));
                    replacement
                }
            };

            if Some(idx) == last {
                // Provides were deferred to here; make sure every exported
                // namespace exists before the body runs.
                for exported in &self.exported {
                    let ensured = self.materializer.ensure(exported, &mut self.ledger, false);
                    replacement.push_str(&ensured);
                }
            }

            self.replace_declaration(require, &replacement);
        }
        Ok(())
    }

    /// Replace bare uses of collapsible namespaces with their flat spelling.
    ///
    /// Longer names go first so `a.b.c.x` never becomes `a_b.c.x`. A match
    /// followed by a quote, an identifier character or `.'` is left alone.
    fn collapse_occurrences(&mut self) {
        let mut keys: Vec<(String, String)> = Vec::new();
        for (ns, flat) in self.required_collapsed.iter().chain(&self.provided_collapsed) {
            if !keys.iter().any(|(seen, _)| seen == ns) {
                keys.push((ns.clone(), flat.clone()));
            }
        }
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let bytes = self.source.as_bytes();
        for (ns, flat) in &keys {
            let mut replaced = 0usize;
            for start in memmem::find_iter(bytes, ns.as_bytes()) {
                let end = start + ns.len();
                if continues_name(bytes, end) {
                    continue;
                }
                let edit = TextEdit::new(Span::from_range(start..end), flat.as_str());
                if self.edits.try_insert(edit) {
                    replaced += 1;
                }
            }
            if replaced > 0 {
                trace!(namespace = %ns, %flat, replaced, "collapsed occurrences");
            }
        }
    }
}

/// True if the byte at `end` means the match is part of a longer name or a
/// string literal.
fn continues_name(bytes: &[u8], end: usize) -> bool {
    match bytes.get(end) {
        Some(b'\'' | b'"') => true,
        Some(&byte) if is_identifier_byte(byte) => true,
        Some(b'.') => bytes.get(end + 1) == Some(&b'\''),
        _ => false,
    }
}

fn warn_if_invalid(ns: &str) {
    if !namespace::is_valid(ns) {
        warn!(namespace = ns, "declared namespace is not a dotted identifier");
    }
}

#[cfg(test)]
#[path = "../tests/engine_tests.rs"]
mod tests;
