//! Common types and utilities for the gcjs namespace rewriter.
//!
//! This crate provides foundational types used across all gcjs crates:
//! - Dotted namespace helpers (`is_ancestor`, `prefixes`, `flatten`)
//! - Byte spans and ordered text edits (`Span`, `TextEdit`, `TextEdits`)
//! - Position/line-map conversion for source locations
//! - Source map decoding and generation

// Dotted namespace names (`a.b.c`)
pub mod namespace;

// Span + edit list over immutable source text
pub mod text_edit;
pub use text_edit::{OffsetTranslator, Span, TextEdit, TextEdits};

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Source Map (v3) decoding and generation
pub mod source_map;
pub use source_map::{Mapping, OriginalLocation, RawSourceMap, SourceMapError, SourceMapGenerator};
