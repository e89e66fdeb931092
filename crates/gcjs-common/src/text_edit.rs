//! Span and text-edit primitives.
//!
//! Rewrites never mutate the input text in place. Callers collect an ordered
//! list of non-overlapping `(span, replacement)` edits and apply them in one
//! pass. The same list is used afterwards to move source positions from the
//! input coordinates into the output coordinates.

use std::fmt;

/// Half-open byte range `[start, end)` in a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Span { start, end }
    }

    /// Build a span from `usize` offsets as returned by string searches.
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start as u32, range.end as u32)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Replace the bytes covered by `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        TextEdit {
            span,
            replacement: replacement.into(),
        }
    }

    /// Length change this edit introduces (`replacement - span`).
    pub fn delta(&self) -> i64 {
        self.replacement.len() as i64 - i64::from(self.span.len())
    }
}

/// Sorted, non-overlapping set of edits over one source string.
#[derive(Debug, Clone, Default)]
pub struct TextEdits {
    edits: Vec<TextEdit>,
}

impl TextEdits {
    pub fn new() -> Self {
        TextEdits { edits: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextEdit> {
        self.edits.iter()
    }

    /// Returns true if `span` overlaps any edit already in the set.
    pub fn is_claimed(&self, span: Span) -> bool {
        // First edit that ends after span.start is the only candidate that
        // can overlap, because edits are sorted and disjoint.
        let idx = self.edits.partition_point(|edit| edit.span.end <= span.start);
        self.edits
            .get(idx)
            .is_some_and(|edit| edit.span.overlaps(span) || (span.is_empty() && edit.span.contains(span.start)))
    }

    /// Insert an edit, keeping the set sorted.
    ///
    /// Returns `false` (and drops the edit) if it overlaps an existing one.
    pub fn try_insert(&mut self, edit: TextEdit) -> bool {
        if self.is_claimed(edit.span) {
            return false;
        }
        let idx = self.edits.partition_point(|existing| existing.span.start <= edit.span.start);
        self.edits.insert(idx, edit);
        true
    }

    /// Apply every edit to `source`, producing the rewritten text.
    pub fn apply(&self, source: &str) -> String {
        let grown: i64 = self.edits.iter().map(TextEdit::delta).sum();
        let capacity = (source.len() as i64 + grown.max(0)) as usize;
        let mut out = String::with_capacity(capacity);
        let mut cursor = 0usize;
        for edit in &self.edits {
            let range = edit.span.as_range();
            out.push_str(&source[cursor..range.start]);
            out.push_str(&edit.replacement);
            cursor = range.end;
        }
        out.push_str(&source[cursor..]);
        out
    }

    /// Build a translator from input offsets to output offsets.
    pub fn translator(&self) -> OffsetTranslator<'_> {
        let mut cumulative = Vec::with_capacity(self.edits.len());
        let mut running = 0i64;
        for edit in &self.edits {
            running += edit.delta();
            cumulative.push(running);
        }
        OffsetTranslator {
            edits: &self.edits,
            cumulative,
        }
    }
}

impl<'a> IntoIterator for &'a TextEdits {
    type Item = &'a TextEdit;
    type IntoIter = std::slice::Iter<'a, TextEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Moves byte offsets of the original text through an edit list.
pub struct OffsetTranslator<'a> {
    edits: &'a [TextEdit],
    /// Running sum of deltas; `cumulative[i]` covers edits `0..=i`.
    cumulative: Vec<i64>,
}

impl OffsetTranslator<'_> {
    /// Output offset of the byte at `offset` in the input text.
    ///
    /// The first byte of a replaced span maps to the start of its
    /// replacement; any later byte inside it returns `None`.
    pub fn translate(&self, offset: u32) -> Option<u32> {
        let passed = self.edits.partition_point(|edit| edit.span.end <= offset);
        if let Some(edit) = self.edits.get(passed)
            && edit.span.contains(offset)
            && offset != edit.span.start
        {
            return None;
        }
        let delta = if passed == 0 {
            0
        } else {
            self.cumulative[passed - 1]
        };
        u32::try_from(i64::from(offset) + delta).ok()
    }
}

#[cfg(test)]
#[path = "../tests/text_edit_tests.rs"]
mod tests;
