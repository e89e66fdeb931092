//! Source-Map Splicer
//!
//! Re-bases an input source map over the rewritten text. Every mapping of
//! the input addresses a position in the text we were given; it is moved
//! through the edit list into the output:
//!
//! - positions before or between edits shift by the accumulated length delta;
//! - a position at the start of a replaced declaration moves to the start of
//!   its replacement, so a line opening with a declaration keeps its anchor;
//! - other positions inside a replaced declaration are dropped;
//! - the epilogue appended after the body gets no mappings.

use gcjs_common::source_map::SourceMapGenerator;
use gcjs_common::{LineMap, Mapping, Position, RawSourceMap, SourceMapError, TextEdits};

/// Build the output map for `output`, produced from `source` by `edits`.
pub fn splice_source_map(
    input: &RawSourceMap,
    source: &str,
    output: &str,
    edits: &TextEdits,
    output_file: Option<&str>,
) -> Result<RawSourceMap, SourceMapError> {
    let mappings = input.decode_mappings()?;
    let source_lines = LineMap::build(source);
    let output_lines = LineMap::build(output);
    let translator = edits.translator();

    let mut generator = SourceMapGenerator::new(output_file.map(str::to_string).or_else(|| input.file.clone()));
    generator.set_source_root(input.source_root.clone());
    for (idx, name) in input.sources.iter().enumerate() {
        let content = input
            .sources_content
            .as_ref()
            .and_then(|contents| contents.get(idx).cloned().flatten());
        generator.add_source_with_content(name.clone(), content);
    }
    for name in &input.names {
        generator.add_name(name.clone());
    }

    let mut dropped = 0usize;
    for mapping in mappings {
        let generated = Position::new(mapping.generated_line, mapping.generated_column);
        let moved = source_lines
            .position_to_offset(generated, source)
            .and_then(|offset| translator.translate(offset))
            .map(|offset| output_lines.offset_to_position(offset, output));
        match moved {
            Some(position) => generator.add_mapping(Mapping {
                generated_line: position.line,
                generated_column: position.column,
                original: mapping.original,
            }),
            None => dropped += 1,
        }
    }

    tracing::debug!(
        kept = generator.mapping_count(),
        dropped,
        "spliced input source map"
    );
    Ok(generator.to_raw())
}

#[cfg(test)]
#[path = "../tests/splice_tests.rs"]
mod tests;
