//! Fatal rewrite conditions.
//!
//! Every error aborts the whole file: there is no partial output.

use gcjs_common::SourceMapError;
use std::fmt;
use thiserror::Error;

/// A require statement found behind a `//` line comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentedRequire {
    /// 1-indexed line of the match
    pub line: u32,
    /// The exact commented-out text
    pub text: String,
}

impl fmt::Display for CommentedRequire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.text)
    }
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(
        "commented out {root}.require statements are not allowed:\n{}",
        format_matches(.matches)
    )]
    CommentedRequire {
        root: String,
        matches: Vec<CommentedRequire>,
    },

    #[error("can't find closure dependency {namespace}")]
    UnresolvedDependency { namespace: String },

    /// The namespace lookup provider failed; its error is passed through as-is.
    #[error(transparent)]
    Lookup(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("input source map: {0}")]
    SourceMap(#[from] SourceMapError),
}

fn format_matches(matches: &[CommentedRequire]) -> String {
    matches
        .iter()
        .map(|m| format!("  {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}
