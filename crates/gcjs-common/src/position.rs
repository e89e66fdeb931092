//! Line/column positions.
//!
//! Source maps address text by 0-indexed line and UTF-16 column, while the
//! rewriter works on byte offsets. `LineMap` converts between the two.

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units, as in source maps)
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Line map for offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line.
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        for idx in memchr::memchr2_iter(b'\n', b'\r', bytes) {
            if bytes[idx] == b'\r' && bytes.get(idx + 1) == Some(&b'\n') {
                continue;
            }
            line_starts.push((idx + 1) as u32);
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a position.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts[line] as usize;
        let end = (offset as usize).min(source.len());
        let column = source
            .get(line_start.min(end)..end)
            .unwrap_or("")
            .chars()
            .map(|ch| ch.len_utf16() as u32)
            .sum();
        Position::new(line as u32, column)
    }

    /// Convert a position to a byte offset.
    ///
    /// Returns `None` if the line does not exist. Columns past the end of the
    /// line clamp to the line terminator.
    pub fn position_to_offset(&self, position: Position, source: &str) -> Option<u32> {
        let line_idx = position.line as usize;
        let line_start = *self.line_starts.get(line_idx)?;
        let line_limit = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(source.len() as u32);
        let slice = source
            .get(line_start as usize..line_limit as usize)
            .unwrap_or("");

        let mut utf16 = 0u32;
        let mut bytes = 0u32;
        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' || utf16 >= position.column {
                break;
            }
            utf16 += ch.len_utf16() as u32;
            bytes += ch.len_utf8() as u32;
        }
        Some(line_start + bytes)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
